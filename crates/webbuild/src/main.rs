use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = webbuild::cli::Cli::parse();
    webbuild::init(cli.verbose);

    webbuild::cli::run(cli)
}
