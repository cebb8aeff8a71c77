/*!
 * # Editing Core
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The text lives in one **`xi_rope::Rope`** inside [`Buffer`]
 * - Positions are `(line, ch)` pairs; internally everything is byte offsets
 *
 * ### 2. Command-Based Editing
 * - Every text edit is a [`Cmd`] compiled to a **Delta**
 * - The same delta moves marks, images, the selection and undo history
 * - Each edit carries an [`Origin`] so observers can tell typing from
 *   structural list edits
 *
 * ### 3. Marks
 * - Inline styles and list sentinels are byte-range [`Mark`]s in a [`MarkStore`]
 * - Inclusivity flags decide whether text typed at a boundary joins the mark
 * - A collapsed toggle leaves a zero-width anchor mark that captures the
 *   next insertion
 *
 * ### 4. Lines
 * - Headings are [`LineClasses`], one per line, following their line
 * - List lines start with a sentinel char covered by a list mark; groups
 *   and labels are derived on demand
 *
 * ## Module Structure
 *
 * - **`document`**: [`Document`], the command surface
 * - **`buffer`**, **`position`**: line/column addressing over the rope
 * - **`marks`**, **`classes`**, **`blocks`**: mark and line class storage
 * - **`annotate`**: toggle and line-splitting removal of inline styles
 * - **`lists`**: sentinels, groups and labels
 * - **`commands`**, **`patch`**, **`history`**: edit compilation, results, undo
 * - **`events`**: synchronous observers
 * - **`keymap`**: default key chords
 */

pub(crate) mod annotate;
pub mod blocks;
pub mod buffer;
pub mod classes;
pub mod commands;
pub mod document;
pub mod events;
pub(crate) mod history;
pub mod keymap;
pub mod lists;
pub mod marks;
pub mod patch;
pub mod position;

pub use blocks::LineClasses;
pub use buffer::Buffer;
pub use classes::{BlockClass, InlineClass, ListKind, MarkClass};
pub use commands::{Cmd, Origin};
pub use document::{ActiveBlock, Document, ImageWidget, MarkSpan};
pub use events::{Change, Emitter, Event, EventKind, SubscriptionId};
pub use keymap::{Command, Keymap};
pub use lists::{DEFAULT_BULLET, ListGroup, ListItem, ListLabel, SENTINEL};
pub use marks::{Mark, MarkId, MarkStore, Stickiness};
pub use patch::Patch;
pub use position::{Position, Range, Selection};
