use clap::Parser;
use drawplan::{Args, default_data_dir, execute, init_logging, load_reference_data};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level, args.log_file)?;

    let (data, source) = load_reference_data(args.tax_data.as_deref(), &data_dir)?;
    tracing::info!(%source, tax_year = data.tax_year, "tax reference data loaded");

    let output = execute(&args.command, &data, args.format)?;
    print!("{output}");

    Ok(())
}
