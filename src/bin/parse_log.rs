use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    seedcurves::apps::run_parse_log(std::env::args().skip(1))
}
