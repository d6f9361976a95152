//! CLI command implementations

pub mod export;
pub mod init;
pub mod preview;
pub mod validate;

use crate::domain::{ExportScope, JurusanId, KelasId};

/// Build an [`ExportScope`] from the optional CLI filters
///
/// Applies jurusan before kelas so the dependent-filter reset cannot drop
/// an explicitly requested kelas filter.
pub(crate) fn scope_from_args(jurusan_id: Option<JurusanId>, kelas_id: Option<KelasId>) -> ExportScope {
    let mut scope = ExportScope::new();
    scope.set_jurusan(jurusan_id);
    scope.set_kelas(kelas_id);
    scope
}
