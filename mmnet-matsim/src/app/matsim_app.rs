use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mmnet_core::model::ModelBundle;
use serde::{Deserialize, Serialize};

use crate::{config::MatsimWriterConfig, export::MatsimIntermodalWriter, writer::MatsimWriterError};

/// Command line tool for writing multimodal networks and transit schedules as MATSim inputs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct MatsimApp {
    #[command(subcommand)]
    pub op: MatsimOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum MatsimOperation {
    /// write a network, its stops and its scheduled services as MATSim files
    Export {
        /// JSON file containing the network, and optionally zoning and services.
        #[arg(short, long)]
        model_file: String,

        /// TOML file with writer settings. defaults apply when not provided.
        #[arg(short, long)]
        configuration_file: Option<String>,

        /// location on disk to write output files. overrides the configured
        /// directory. if neither is set, use the current working directory.
        #[arg(short, long)]
        output_directory: Option<String>,

        /// gzip every output file
        #[arg(long)]
        compress: bool,
    },
}

impl MatsimOperation {
    pub fn run(&self) -> Result<(), MatsimWriterError> {
        match self {
            MatsimOperation::Export {
                model_file,
                configuration_file,
                output_directory,
                compress,
            } => {
                let mut config = match configuration_file {
                    Some(file) => MatsimWriterConfig::from_file(Path::new(file))?,
                    None => MatsimWriterConfig::default(),
                };
                if let Some(out) = output_directory {
                    config.output_directory = Some(PathBuf::from(out));
                }
                config.compress |= *compress;

                let bundle = ModelBundle::from_json_file(Path::new(model_file))?;
                let summary = MatsimIntermodalWriter::new(config).write_bundle(&bundle)?;
                log::info!(
                    "finished export to {}: {} links, {} files",
                    summary.target_crs,
                    summary.network.links,
                    summary.files.len()
                );
                Ok(())
            }
        }
    }
}
