fn main() -> anyhow::Result<()> {
    lux::cli::run_cli()
}
