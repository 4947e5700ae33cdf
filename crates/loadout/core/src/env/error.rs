//! Oracle access errors.

use super::{ItemKindId, MaterialId};
use crate::error::{ErrorSeverity, LoadoutFault};

/// Errors that occur when accessing oracle data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ItemCatalog is not available in the environment.
    #[error("ItemCatalog not available")]
    CatalogNotAvailable,

    /// ModuleOracle is not available in the environment.
    #[error("ModuleOracle not available")]
    ModulesNotAvailable,

    /// Item definition was not found by kind.
    #[error("item kind {0:?} not found")]
    ItemKindNotFound(ItemKindId),

    /// Material definition was not found by id.
    #[error("material {0:?} not found")]
    MaterialNotFound(MaterialId),
}

impl LoadoutFault for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            CatalogNotAvailable | ModulesNotAvailable => ErrorSeverity::Fatal,
            ItemKindNotFound(_) | MaterialNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            CatalogNotAvailable => "ORACLE_CATALOG_NOT_AVAILABLE",
            ModulesNotAvailable => "ORACLE_MODULES_NOT_AVAILABLE",
            ItemKindNotFound(_) => "ORACLE_ITEM_KIND_NOT_FOUND",
            MaterialNotFound(_) => "ORACLE_MATERIAL_NOT_FOUND",
        }
    }
}
