use clap::Parser;
use railsense::app::{AppError, RailsenseApp};

fn main() -> Result<(), AppError> {
    env_logger::init();
    let args = RailsenseApp::parse();
    args.op.run()
}
