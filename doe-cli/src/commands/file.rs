//! File command handlers

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use colored::*;
use doe_core::domain::file::FileType;
use std::path::PathBuf;

use crate::config::Config;

/// File subcommands
#[derive(Subcommand)]
pub enum FileCommands {
    /// Upload a file to cloud storage
    Upload {
        /// Local file to upload
        path: PathBuf,

        /// Role of the file in a job
        #[arg(short = 't', long = "type", value_enum, default_value_t = FileKind::Input)]
        kind: FileKind,
    },
}

/// File roles accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileKind {
    Input,
    Template,
    Param,
    Script,
}

impl From<FileKind> for FileType {
    fn from(kind: FileKind) -> Self {
        match kind {
            FileKind::Input => FileType::Input,
            FileKind::Template => FileType::Template,
            FileKind::Param => FileType::Parameters,
            FileKind::Script => FileType::Script,
        }
    }
}

/// Handle file commands
pub async fn handle_file_command(command: FileCommands, config: &Config) -> Result<()> {
    match command {
        FileCommands::Upload { path, kind } => {
            let client = config.client()?;
            let file = client
                .upload_file(&path, kind.into())
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;

            println!("{} Uploaded {}", "✓".green(), path.display());
            println!("  ID:   {}", file.id.cyan());
            if let Some(name) = &file.name {
                println!("  Name: {}", name);
            }
            if let Some(size) = file.decompressed_size {
                println!("  Size: {} bytes", size);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_maps_to_type_id() {
        assert_eq!(FileType::from(FileKind::Input).type_id(), 1);
        assert_eq!(FileType::from(FileKind::Template).type_id(), 2);
        assert_eq!(FileType::from(FileKind::Param).type_id(), 3);
        assert_eq!(FileType::from(FileKind::Script).type_id(), 4);
    }
}
