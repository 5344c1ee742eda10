use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod list;
pub mod model;
pub mod texture;

/// Entry filter for `list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Model,
    Texture,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List archive contents
    List {
        /// Archive file (.res or .res.gz)
        archive: PathBuf,

        /// Only show entries of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindFilter>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Decode a model and summarize its nodes
    Model {
        /// Archive file (.res or .res.gz)
        archive: PathBuf,

        /// Model entry name
        name: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Write the JSON summary to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a texture and report its format
    Texture {
        /// Archive file (.res or .res.gz)
        archive: PathBuf,

        /// Texture entry name
        name: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::List { archive, kind, json } => list::execute(archive, *kind, *json),
            Commands::Model {
                archive,
                name,
                json,
                output,
            } => model::execute(archive, name, *json, output.as_deref()),
            Commands::Texture { archive, name, json } => texture::execute(archive, name, *json),
        }
    }
}
