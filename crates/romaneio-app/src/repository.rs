//! Repository adapters for persistence layer

use std::path::PathBuf;

use romaneio_infra::persistence::{
    FileClassificationStandardRepository, FileTicketRepository, FileWarehouseRateRepository,
};
use romaneio_types::Result;

use crate::config::Config;

/// Open file-based ticket repository
pub fn open_ticket_repo(config: &Config) -> Result<FileTicketRepository> {
    open_ticket_repo_at(config.data_dir()?)
}

/// Open file-based classification standard repository
pub fn open_standard_repo(config: &Config) -> Result<FileClassificationStandardRepository> {
    open_standard_repo_at(config.data_dir()?)
}

/// Open file-based warehouse rate repository
pub fn open_warehouse_repo(config: &Config) -> Result<FileWarehouseRateRepository> {
    open_warehouse_repo_at(config.data_dir()?)
}

/// Open ticket repository at a custom directory
pub fn open_ticket_repo_at(data_dir: PathBuf) -> Result<FileTicketRepository> {
    FileTicketRepository::open(data_dir)
}

pub fn open_standard_repo_at(data_dir: PathBuf) -> Result<FileClassificationStandardRepository> {
    FileClassificationStandardRepository::open(data_dir)
}

pub fn open_warehouse_repo_at(data_dir: PathBuf) -> Result<FileWarehouseRateRepository> {
    FileWarehouseRateRepository::open(data_dir)
}
