// Declarative benchmark skip lists
//
// A skip list maps operator names to the kernel implementations that must not
// run under a given run mode. An operator with no implementations listed is
// skipped entirely; an operator with implementations listed only skips those.
//
// ```yaml
// gemm:
//   - triton_tma_persistent_matmul
// ragged_attention:
// ```

mod entry;
mod error;
mod parse;
mod registry;

pub use entry::{Exclusion, ExclusionEntry, ExclusionStatus};
pub use error::{MalformedInput, Result, SkipListError};
pub use registry::{DuplicatePolicy, LoadOptions, SkipList};
