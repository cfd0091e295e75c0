//! Shared chunk, byte and line read views over one serial data source.
//!
//! A producer (the port's readiness worker) publishes raw chunks through a
//! [`ChunkSink`]. The [`ReadPipeline`] owns the fan-out and derives two
//! further granularities from the chunks on demand:
//! - bytes, in arrival order
//! - `\n`-terminated lines, decoded as UTF-8
//!
//! Each granularity is materialised at most once per pipeline. Every
//! subscriber gets a [`ReadView`] on the same underlying sequence, from the
//! moment it subscribed, with nothing dropped or reordered. Dropping the sink
//! (or shutting the pipeline down) finishes every view.

pub mod error;
mod fanout;
pub mod line;
pub mod pipeline;
pub mod view;

pub use error::{Result, StreamError};
pub use line::{LineDecoder, LINE_TERMINATOR, NON_UTF8_LINE};
pub use pipeline::{ChunkSink, ReadPipeline, ReadStats};
pub use view::{ReadView, ViewKind};
