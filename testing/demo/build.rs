fn main() -> Result<(), Box<dyn std::error::Error>> {
    srcgen::build!();

    Ok(())
}
