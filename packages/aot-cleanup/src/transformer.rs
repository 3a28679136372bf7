use ts::{SourceFile, TransformationContext};

use crate::error::TransformResult;
use crate::run::AotCleanupRun;
use crate::transform_walker::{AotTransformWalker, TransformWalker};

/// Lowers one file. The input is left untouched; the returned copy shares
/// its identity and symbol table.
pub fn aot_cleanup_transformer(
    source_file: &SourceFile,
    context: &mut TransformationContext,
    run: &mut AotCleanupRun,
) -> TransformResult<SourceFile> {
    let mut transformed = source_file.clone();
    let options = run.walker_options().clone();
    AotTransformWalker::with_options(&mut transformed, context, run, options).walk()?;
    transformed.locals = source_file.locals.clone();
    Ok(transformed)
}
