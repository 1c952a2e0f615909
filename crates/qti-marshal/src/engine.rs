//! The iterative conversion engine.
//!
//! [`convert`] walks a tree of any depth with an explicit trail stack
//! instead of native recursion. What counts as a child, how a node's
//! counterpart is assembled and how leaves are converted is left to a
//! [`TraversalPolicy`]; the engine only schedules the work.

use crate::error::{Error, Result};

/// The per-family hooks the engine drives.
pub trait TraversalPolicy {
    /// A borrowed input node.
    type Node: Copy;
    /// The converted counterpart of a node.
    type Output;
    /// Accumulates a composite node's converted children.
    type Collection;

    /// Family name used in diagnostics and logs.
    fn name(&self) -> &'static str;

    /// Whether `node` is converted in one shot rather than expanded.
    fn is_leaf(&self, node: Self::Node) -> bool;

    /// The family children of a composite node, in order.
    fn children_of(&self, node: Self::Node) -> Result<Vec<Self::Node>>;

    fn collection_for(&self, node: Self::Node) -> Result<Self::Collection>;

    /// Add one converted child to `collection`, enforcing what it accepts.
    fn append(
        &self,
        node: Self::Node,
        collection: &mut Self::Collection,
        child: Self::Output,
    ) -> Result<()>;

    /// Build the counterpart of a composite node from its converted children.
    fn finalize_with_children(
        &self,
        node: Self::Node,
        collection: Self::Collection,
    ) -> Result<Self::Output>;

    fn convert_leaf(&self, node: Self::Node) -> Result<Self::Output>;

    /// Short label for a node, for logs.
    fn describe(&self, node: Self::Node) -> String;
}

/// One entry of the trail stack.
#[derive(Debug)]
enum TrailItem<N, O> {
    /// Not yet looked at.
    Pending { node: N, is_root: bool },
    /// Expanded; its `arity` children are being converted.
    Marked { node: N, is_root: bool, arity: usize },
    /// A finished result waiting to move to the accumulator.
    Finished(O),
}

/// State of a single [`convert`] call.
struct ConversionJob<N, O> {
    trail: Vec<TrailItem<N, O>>,
    finals: Vec<O>,
    processed: Vec<N>,
}

impl<N: Copy, O> ConversionJob<N, O> {
    fn new(root: N) -> Self {
        Self {
            trail: vec![TrailItem::Pending {
                node: root,
                is_root: true,
            }],
            finals: Vec::new(),
            processed: Vec::new(),
        }
    }
}

/// Convert the tree rooted at `root` with `policy`.
///
/// Children are converted before their parent and handed to it in their
/// original order. The first error aborts the conversion.
pub fn convert<P: TraversalPolicy>(policy: &P, root: P::Node) -> Result<P::Output> {
    let family = policy.name();
    let mut job: ConversionJob<P::Node, P::Output> = ConversionJob::new(root);

    while let Some(item) = job.trail.pop() {
        match item {
            TrailItem::Pending { node, is_root } if !policy.is_leaf(node) => {
                let children = policy.children_of(node)?;
                tracing::trace!(
                    family,
                    node = %policy.describe(node),
                    children = children.len(),
                    "Expanding"
                );
                job.trail.push(TrailItem::Marked {
                    node,
                    is_root,
                    arity: children.len(),
                });
                job.trail.extend(
                    children
                        .into_iter()
                        .rev()
                        .map(|child| TrailItem::Pending {
                            node: child,
                            is_root: false,
                        }),
                );
            }

            TrailItem::Marked {
                node,
                is_root,
                arity,
            } => {
                // Every child left exactly one result behind.
                let start = job
                    .finals
                    .len()
                    .checked_sub(arity)
                    .ok_or(Error::TrailExhausted { family })?;
                let results = job.finals.split_off(start);
                let mut collection = policy.collection_for(node)?;
                for child in results {
                    policy.append(node, &mut collection, child)?;
                }
                let output = policy.finalize_with_children(node, collection)?;
                job.processed.push(node);
                tracing::trace!(family, node = %policy.describe(node), "Finalized");
                if is_root {
                    return Ok(finish(policy, &job, output));
                }
                job.trail.push(TrailItem::Finished(output));
            }

            TrailItem::Finished(output) => job.finals.push(output),

            TrailItem::Pending { node, is_root } => {
                let output = policy.convert_leaf(node)?;
                job.processed.push(node);
                if is_root {
                    return Ok(finish(policy, &job, output));
                }
                job.finals.push(output);
            }
        }
    }

    Err(Error::TrailExhausted { family })
}

fn finish<P: TraversalPolicy>(
    policy: &P,
    job: &ConversionJob<P::Node, P::Output>,
    output: P::Output,
) -> P::Output {
    tracing::debug!(
        family = policy.name(),
        processed = job.processed.len(),
        "Conversion finished"
    );
    output
}
