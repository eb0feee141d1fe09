use chrono::NaiveDate;
use era5::{Dataset, Domain, Era5, Era5Error, HttpRetriever, LogicalRequest, Product, Resolution};

/// Prints which files a monthly range request would download, without fetching anything.
#[tokio::main]
async fn main() -> Result<(), Era5Error> {
    let dataset = Dataset::new(
        Product::SingleLevels,
        Resolution::Monthly,
        ["2m_temperature", "total_precipitation"],
    )
    .with_domain(Domain::area(72.0, -25.0, 34.0, 45.0)?);

    let start = NaiveDate::from_ymd_opt(2019, 11, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date");
    let end = NaiveDate::from_ymd_opt(2021, 2, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date");

    let request = LogicalRequest::builder()
        .dataset(dataset.clone())
        .range_start(start)
        .range_end(end)
        .build()?;

    let era5 = Era5::with_cache_folder(
        dataset,
        HttpRetriever::new("http://localhost:8080/resources"),
        "cache".into(),
    )
    .await?;

    for unit in era5.plan(&request).await {
        let status = if unit.cached { "cached" } else { "missing" };
        println!(
            "{:8} {} {}-{}",
            status,
            unit.path.display(),
            unit.parameters.year.join(","),
            unit.parameters.month.join(",")
        );
    }
    Ok(())
}
