use miette::Result;

fn main() -> Result<()> {
    arxive::cli::run()?;
    Ok(())
}
