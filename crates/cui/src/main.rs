use arcana_cui::LaunchOptions;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "arcana-cui", about = "Terminal tarot reading")]
struct Cli {
    #[command(flatten)]
    launch: LaunchOptions,
}

fn main() -> anyhow::Result<()> {
    arcana_cui::run(Cli::parse().launch)
}
