use pypistat::{Package, PackageIdentifier};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Opt {
    /// Package identifier: `name`, `name/version`, or `https://host/pypi/name[/version]`
    identifier: String,

    /// Override the index base URL (e.g. a private mirror's `/pypi` root)
    #[structopt(long)]
    registry: Option<String>,

    /// Print a per-version download chart
    #[structopt(long)]
    chart: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opt = Opt::from_args();

    let mut ident = PackageIdentifier::parse(&opt.identifier)
        .ok_or_else(|| anyhow::anyhow!("unrecognized package identifier: {}", opt.identifier))?;
    if let Some(registry) = opt.registry {
        ident.base_url = registry.trim_end_matches("/").to_string();
    }

    let stats = Package::new(ident)?.fetch().await?;

    println!("Total downloads:   {}", stats.downloads());
    println!("Average downloads: {}", stats.average_downloads());
    if opt.chart {
        print!("{}", stats.chart());
    }

    Ok(())
}
