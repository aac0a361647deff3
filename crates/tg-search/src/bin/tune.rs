use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tg_data::{train_test_split, CsvLoader};
use tg_report::ResultsTable;
use tg_search::{GridSearchDriver, KNearest, Namespaced, ParamGrid, SearchConfig};
use tg_types::{Accuracy, Estimator, Scorer};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: tg-tune <data.csv> [target-column]")?;
    let target = args.next().unwrap_or_else(|| "class".to_string());

    let data = CsvLoader::new().load(&path, &target)?;
    let (train, test) = train_test_split(&data, 0.2, 42)?;

    let grid = ParamGrid::new()
        .add_ints("model__k", &[1, 3, 5, 7])
        .add_floats("model__power", &[1.0, 2.0, 3.0]);
    let builder = || {
        Box::new(Namespaced::new("model", Box::new(KNearest::default()))) as Box<dyn Estimator>
    };
    let driver = GridSearchDriver::new(grid, SearchConfig::default().with_seed(7));

    let outcome = driver.run(&train, &builder, &Accuracy)?;

    let table = ResultsTable::from_summaries(&outcome.summaries)
        .sorted_by_mean()
        .shorten_names("__")?;
    println!("{table}");
    println!("{}", table.pivot("k", "power")?);

    let predicted = outcome.model.predict(&test)?;
    let holdout = Accuracy.score(test.labels(), &predicted);
    println!(
        "best: {} (cv mean {:.4} ± {:.4})",
        outcome.best.params, outcome.best.mean_score, outcome.best.std_score
    );
    println!("holdout {}: {:.4}", Accuracy.name(), holdout);

    Ok(())
}
