use clap::Parser;
use mmnet_matsim::{app::MatsimApp, writer::MatsimWriterError};

fn main() -> Result<(), MatsimWriterError> {
    env_logger::init();
    let args = MatsimApp::parse();
    args.op.run()
}
