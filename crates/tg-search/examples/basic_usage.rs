use tg_report::ResultsTable;
use tg_search::{GridSearchDriver, KNearest, ParamGrid, SearchConfig};
use tg_types::{Accuracy, Dataset, Estimator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("TuneGrid basic usage");

    // Two well-separated clusters of points
    let mut features = Vec::new();
    let mut labels = Vec::new();
    for i in 0..25 {
        features.push(vec![i as f64 * 0.1, i as f64 * 0.05]);
        labels.push(0);
        features.push(vec![8.0 + i as f64 * 0.1, 8.0 + i as f64 * 0.05]);
        labels.push(1);
    }
    let data = Dataset::new(
        vec!["x".to_string(), "y".to_string()],
        features,
        labels,
        vec!["left".to_string(), "right".to_string()],
    )?;
    println!("Generated {} rows of sample data", data.n_rows());

    // Search neighbour count against distance exponent
    let grid = ParamGrid::new()
        .add_ints("k", &[1, 3, 5])
        .add_floats("power", &[1.0, 2.0]);
    println!("Grid expands to {} combinations", grid.size()?);

    let builder = || Box::new(KNearest::default()) as Box<dyn Estimator>;
    let driver = GridSearchDriver::new(
        grid,
        SearchConfig::default().with_k_folds(5).with_seed(1),
    );
    let outcome = driver.run(&data, &builder, &Accuracy)?;

    let table = ResultsTable::from_summaries(&outcome.summaries).sorted_by_mean();
    println!("{table}");
    println!("{}", table.pivot("k", "power")?);
    println!(
        "Best combination: {} with mean accuracy {:.4}",
        outcome.best.params, outcome.best.mean_score
    );

    Ok(())
}
