use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    seedcurves::apps::run_convert_arrays(std::env::args().skip(1))
}
