use oxc_span::Span;
use ts::{NodeId, SourceFile, SyntaxKind};

/// Finds the node of `remote` that corresponds to `node` of `local`.
///
/// When both files were parsed from the same text the parsed ids line up, so
/// the original id is returned once its kind and span are confirmed.
/// Otherwise the search descends from `remote_root` into every candidate
/// whose range contains the target and stops at the first node with the
/// same kind and start offset. Synthesized nodes have no position and never
/// match.
pub fn find_remote_match(
    remote: &SourceFile,
    remote_root: NodeId,
    local: &SourceFile,
    node: NodeId,
) -> Option<NodeId> {
    let span = local.span(node)?;
    let kind = local.kind(node);

    if remote.text_hash() == local.text_hash() {
        let original = local.original_node(node);
        let same = remote
            .get_node(original)
            .is_some_and(|twin| remote.is_parsed(original) && twin.kind == kind && twin.span == Some(span));
        if same {
            return Some(original);
        }
    }

    match_candidate(remote, remote_root, kind, span)
}

fn match_candidate(remote: &SourceFile, candidate: NodeId, kind: SyntaxKind, target: Span) -> Option<NodeId> {
    let span = remote.span(candidate)?;
    if remote.kind(candidate) == kind && span.start == target.start {
        return Some(candidate);
    }
    if span.start <= target.start && target.end <= span.end {
        return remote
            .children(candidate)
            .into_iter()
            .find_map(|child| match_candidate(remote, child, kind, target));
    }
    None
}
