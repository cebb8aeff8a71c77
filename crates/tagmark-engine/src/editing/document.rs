use log::debug;
use xi_rope::delta::Transformer;
use xi_rope::{Delta, RopeInfo};

use crate::editing::commands::{self, Compiled};
use crate::editing::events::{Emitter, SubscriptionId};
use crate::editing::history::{History, Revert};
use crate::editing::lists::{self, DEFAULT_BULLET, ListGroup, ListLabel, SENTINEL};
use crate::editing::{
    BlockClass, Buffer, Change, Cmd, Command, Event, EventKind, InlineClass, LineClasses,
    ListKind, MarkClass, MarkId, MarkStore, Origin, Patch, Position, Range, Selection, Stickiness,
    annotate,
};
use crate::error::{EditorError, Result};
use crate::markup::export::{self, DEFAULT_LINE_BREAK};
use crate::markup::{FormatRegistry, TagMap, import};
use crate::state::{DocumentState, Marker};

/// Block state of the selected lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBlock {
    Class(BlockClass),
    Normal,
    /// Selected lines disagree
    Mixed,
}

/// An image placed at a buffer position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageWidget {
    pub pos: Position,
    pub src: String,
    pub inline: bool,
}

/// A mark as seen from outside: positions instead of byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSpan {
    pub id: MarkId,
    pub class: MarkClass,
    pub range: Range,
    pub inclusive_left: bool,
    pub inclusive_right: bool,
    pub anchor: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Image {
    offset: usize,
    src: String,
    inline: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Cursor {
    anchor: usize,
    head: usize,
}

/// Rich-text document: a line buffer with marks, line classes and lists
/// layered over it.
///
/// Every text change goes through [`Document::apply`], which compiles a
/// [`Cmd`] to a rope delta and carries marks, images, the selection, line
/// classes and undo history through that same delta.
///
/// ```rust
/// # use tagmark_engine::editing::{Document, InlineClass, Range};
/// let mut doc = Document::from_text("Testing\nformatting");
/// doc.toggle_inline(InlineClass::Bold, Some(Range::new((0, 0), (0, 7)))).unwrap();
/// assert_eq!(doc.export(None), "<strong>Testing</strong><br />formatting");
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) buffer: Buffer,
    pub(crate) marks: MarkStore,
    pub(crate) blocks: LineClasses,
    pub(crate) images: Vec<Image>,
    pub(crate) cursor: Cursor,
    pub(crate) history: History,
    pub(crate) emitter: Emitter,
    pub(crate) tags: TagMap,
    pub(crate) bullet: String,
    pub(crate) labels: Vec<ListLabel>,
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_tags(TagMap::default())
    }

    pub fn with_tags(tags: TagMap) -> Self {
        Self {
            buffer: Buffer::default(),
            marks: MarkStore::new(),
            blocks: LineClasses::new(),
            images: Vec::new(),
            cursor: Cursor::default(),
            history: History::default(),
            emitter: Emitter::new(),
            tags,
            bullet: DEFAULT_BULLET.to_string(),
            labels: Vec::new(),
            version: 0,
        }
    }

    /// Unformatted document holding `text`.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.buffer = Buffer::new(text);
        doc
    }

    /// Label used for unordered list items.
    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        lists::renumber(&mut self);
        self
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: TagMap) {
        self.tags = tags;
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Full buffer text, list sentinels included.
    pub fn value(&self) -> String {
        self.buffer.text()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn line(&self, line: usize) -> Option<String> {
        self.buffer.line(line).map(|text| text.into_owned())
    }

    /// Replace the text of one line.
    pub fn set_line(&mut self, line: usize, text: &str) -> Result<Patch> {
        let len = self.buffer.line_len(line);
        self.apply(
            Cmd::ReplaceRange {
                range: Range::new((line, 0), (line, len)),
                text: text.to_string(),
            },
            Origin::Paste,
        )
    }

    /// Apply command to document
    ///
    /// 1. Compile the `Cmd` to an xi-rope `Delta` against the current buffer
    /// 2. Apply the delta to the buffer
    /// 3. Transform marks, images, selection and history through it
    /// 4. Shift line classes when lines were added or removed
    /// 5. React to list edits and renumber
    pub fn apply(&mut self, cmd: Cmd, origin: Origin) -> Result<Patch> {
        let compiled = commands::compile_command(&self.buffer, &cmd)?;
        self.apply_compiled(compiled, origin, Stickiness::Inclusivity)
    }

    pub(crate) fn apply_compiled(
        &mut self,
        compiled: Compiled,
        origin: Origin,
        stickiness: Stickiness,
    ) -> Result<Patch> {
        let Compiled {
            delta,
            replaced,
            text,
            from,
            to,
        } = compiled;
        let removed = self.buffer.slice(replaced.clone()).into_owned();
        let change = Change {
            from,
            to,
            text,
            removed,
            origin,
        };
        self.emitter.emit(&Event::BeforeChange(change.clone()));

        let continue_list = if origin == Origin::Input
            && change.text == "\n"
            && self.buffer.line_len(from.line) > 1
        {
            lists::list_kind_of_line(self, from.line)
        } else {
            None
        };

        self.buffer.apply(&delta);
        let dropped = self.marks.transform(&delta, stickiness);
        self.transform_images(&delta);
        self.transform_cursor(&delta);
        self.blocks
            .splice(from.line, to.line, change.text.matches('\n').count());

        let revert = Revert {
            range: replaced.start..replaced.start + change.text.len(),
            text: change.removed.clone(),
        };
        match origin {
            Origin::Undo => self.history.push_redo(revert),
            Origin::Redo => self.history.push_undo(revert),
            origin if origin.is_user() => self.history.record(revert),
            _ => self.history.transform(&delta),
        }

        self.version += 1;
        let changed = commands::changed_ranges(&delta);
        debug!(
            "apply {:?} {}-{} +{}b -{}b (v{}, {} marks dropped)",
            origin,
            change.from,
            change.to,
            change.text.len(),
            change.removed.len(),
            self.version,
            dropped.len()
        );
        self.emitter.emit(&Event::Change(Some(change.clone())));

        if !matches!(origin, Origin::Structural | Origin::SetValue) {
            let removed = lists::remove_stray_sentinels(self)?;
            if removed > 0 {
                debug!("removed {removed} sentinels left inside lines");
            }
        }

        if let Some(kind) = continue_list {
            let next = from.line + 1;
            if !lists::is_list_line(self, next) {
                debug!("continue {kind} list on line {next}");
                lists::insert_sentinel(self, next, kind)?;
            }
        }
        lists::renumber(self);

        Ok(Patch {
            changed,
            new_selection: self.selection(),
            version: self.version,
            change,
        })
    }

    fn transform_images(&mut self, delta: &Delta<RopeInfo>) {
        let mut transformer = Transformer::new(delta);
        for image in &mut self.images {
            image.offset = transformer.transform(image.offset, false);
        }
    }

    fn transform_cursor(&mut self, delta: &Delta<RopeInfo>) {
        let mut transformer = Transformer::new(delta);
        self.cursor.anchor = transformer.transform(self.cursor.anchor, true);
        self.cursor.head = transformer.transform(self.cursor.head, true);
    }

    pub fn selection(&self) -> Selection {
        Selection {
            anchor: self.buffer.position_of(self.cursor.anchor),
            head: self.buffer.position_of(self.cursor.head),
        }
    }

    /// Move the selection.
    ///
    /// A head landing on a list sentinel is pushed past it when moving
    /// forward, or to the end of the previous line when moving back. Anchor
    /// marks not at the new head are dropped.
    pub fn set_selection(
        &mut self,
        anchor: impl Into<Position>,
        head: impl Into<Position>,
    ) -> Result<Selection> {
        let requested_anchor = self.buffer.clip(anchor.into());
        let mut head = self.buffer.clip(head.into());
        let collapsed = requested_anchor == head;
        let previous = self.selection();

        if self.buffer.char_at(head) == Some(SENTINEL) {
            if previous.head < head || head.line == 0 {
                head.ch += 1;
            } else {
                let line = head.line - 1;
                head = Position::new(line, self.buffer.line_len(line));
            }
        }
        let anchor = if collapsed { head } else { requested_anchor };
        let next = Selection { anchor, head };
        self.emitter.emit(&Event::BeforeSelectionChange {
            from: previous,
            to: next,
        });

        self.cursor = Cursor {
            anchor: self.buffer.offset_of(anchor)?,
            head: self.buffer.offset_of(head)?,
        };
        let cleared = self.marks.clear_anchors_except(self.cursor.head);
        if cleared > 0 {
            debug!("dropped {cleared} unused anchor marks");
        }
        self.emitter.emit(&Event::CursorActivity(next));
        Ok(next)
    }

    pub fn set_cursor(&mut self, at: impl Into<Position>) -> Result<Selection> {
        let at = at.into();
        self.set_selection(at, at)
    }

    /// `range`, or the selection when `None`, clipped to the buffer.
    fn resolve(&self, range: Option<Range>) -> Result<Range> {
        let range = range.unwrap_or_else(|| self.selection().range());
        let last = self.buffer.line_count() - 1;
        for pos in [range.start, range.end] {
            if pos.line > last {
                return Err(EditorError::InvalidPosition {
                    line: pos.line,
                    ch: pos.ch,
                });
            }
        }
        Ok(Range::new(
            self.buffer.clip(range.start),
            self.buffer.clip(range.end),
        ))
    }

    fn formatting_changed(&mut self, class: MarkClass, added: Vec<MarkId>) {
        self.version += 1;
        self.emitter.emit(&Event::MarkerChange { class, added });
        self.emitter.emit(&Event::Change(None));
    }

    /// Apply `class` over the range, or remove it when the whole range
    /// already has it. Returns the marks created.
    pub fn toggle_inline(&mut self, class: InlineClass, range: Option<Range>) -> Result<Vec<MarkId>> {
        let range = self.resolve(range)?;
        let added = annotate::toggle(self, class, range)?;
        debug!("toggle {class} over {range}: {} marks added", added.len());
        self.formatting_changed(MarkClass::Inline(class), added.clone());
        Ok(added)
    }

    /// Remove `class`, or every inline class when `None`, from the range.
    pub fn remove_formatting(&mut self, class: Option<InlineClass>, range: Option<Range>) -> Result<()> {
        let range = self.resolve(range)?;
        annotate::remove(self, class, range)?;
        debug!("remove {class:?} over {range}");
        self.version += 1;
        self.emitter.emit(&Event::Change(None));
        Ok(())
    }

    pub fn is_range_marked(&self, range: Range, class: Option<InlineClass>) -> Result<bool> {
        let range = self.resolve(Some(range))?;
        annotate::is_range_marked(self, range, class)
    }

    pub fn bold(&mut self, range: Option<Range>) -> Result<Vec<MarkId>> {
        self.toggle_inline(InlineClass::Bold, range)
    }

    pub fn italic(&mut self, range: Option<Range>) -> Result<Vec<MarkId>> {
        self.toggle_inline(InlineClass::Italic, range)
    }

    pub fn underline(&mut self, range: Option<Range>) -> Result<Vec<MarkId>> {
        self.toggle_inline(InlineClass::Underline, range)
    }

    pub fn strikethrough(&mut self, range: Option<Range>) -> Result<Vec<MarkId>> {
        self.toggle_inline(InlineClass::Strikethrough, range)
    }

    pub fn annotate(&mut self, range: Option<Range>) -> Result<Vec<MarkId>> {
        self.toggle_inline(InlineClass::Annotation, range)
    }

    /// Give every line of the range `class`, replacing any previous one.
    pub fn set_block(&mut self, class: BlockClass, range: Option<Range>) -> Result<()> {
        let range = self.resolve(range)?;
        for line in range.lines() {
            self.blocks.set(line, class);
        }
        debug!("block {class} on lines {:?}", range.lines());
        self.version += 1;
        self.emitter.emit(&Event::Change(None));
        Ok(())
    }

    pub fn clear_block(&mut self, range: Option<Range>) -> Result<()> {
        let range = self.resolve(range)?;
        for line in range.lines() {
            self.blocks.clear(line);
        }
        debug!("clear block on lines {:?}", range.lines());
        self.version += 1;
        self.emitter.emit(&Event::Change(None));
        Ok(())
    }

    pub fn block_at(&self, line: usize) -> Option<BlockClass> {
        self.blocks.get(line)
    }

    /// Turn the range's lines into `kind` list items, or back into plain
    /// lines when all of them already are list items.
    pub fn set_list(&mut self, kind: ListKind, range: Option<Range>) -> Result<()> {
        let range = self.resolve(range)?;
        debug!("list {kind} on lines {:?}", range.lines());
        lists::set_list(self, kind, range)
    }

    pub fn list_groups(&self) -> Vec<ListGroup> {
        lists::groups(self)
    }

    pub fn list_labels(&self) -> &[ListLabel] {
        &self.labels
    }

    /// Inline classes of the marks at the cursor head.
    pub fn active_styles_at_cursor(&self) -> Vec<InlineClass> {
        let present: Vec<InlineClass> = self
            .marks
            .at(self.cursor.head)
            .filter_map(|m| m.class.inline())
            .collect();
        InlineClass::ALL
            .into_iter()
            .filter(|class| present.contains(class))
            .collect()
    }

    pub fn active_block_at_selection(&self) -> ActiveBlock {
        let range = self.selection().range();
        let mut classes = range.lines().map(|line| self.blocks.get(line));
        let first = classes.next().flatten();
        if classes.any(|class| class != first) {
            return ActiveBlock::Mixed;
        }
        first.map_or(ActiveBlock::Normal, ActiveBlock::Class)
    }

    /// Place an image at the cursor head.
    pub fn insert_image(&mut self, src: &str, inline: bool) -> Result<ImageWidget> {
        if src.is_empty() {
            return Err(EditorError::MissingSource);
        }
        let image = Image {
            offset: self.cursor.head,
            src: src.to_string(),
            inline,
        };
        let widget = self.widget(&image);
        debug!("image {src} at {}", widget.pos);
        self.images.push(image);
        self.version += 1;
        self.emitter.emit(&Event::Change(None));
        Ok(widget)
    }

    fn widget(&self, image: &Image) -> ImageWidget {
        ImageWidget {
            pos: self.buffer.position_of(image.offset),
            src: image.src.clone(),
            inline: image.inline,
        }
    }

    pub fn images(&self) -> Vec<ImageWidget> {
        self.images.iter().map(|image| self.widget(image)).collect()
    }

    /// Revert the last recorded edit. Returns false when there is none.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(revert) = self.history.pop_undo() else {
            return Ok(false);
        };
        let compiled = commands::compile_bytes(&self.buffer, revert.range, &revert.text)?;
        self.apply_compiled(compiled, Origin::Undo, Stickiness::Inclusivity)?;
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let Some(revert) = self.history.pop_redo() else {
            return Ok(false);
        };
        let compiled = commands::compile_bytes(&self.buffer, revert.range, &revert.text)?;
        self.apply_compiled(compiled, Origin::Redo, Stickiness::Inclusivity)?;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Run a keymap command against the selection.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Toggle(class) => self.toggle_inline(class, None).map(|_| ()),
            Command::RemoveFormatting => self.remove_formatting(None, None),
            Command::Block(class) => self.set_block(class, None),
        }
    }

    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.emitter.on(kind, listener)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.emitter.off(id)
    }

    /// Every mark, in creation order.
    pub fn mark_spans(&self) -> Vec<MarkSpan> {
        self.marks
            .iter()
            .map(|mark| MarkSpan {
                id: mark.id,
                class: mark.class,
                range: Range::new(
                    self.buffer.position_of(mark.range.start),
                    self.buffer.position_of(mark.range.end),
                ),
                inclusive_left: mark.inclusive_left,
                inclusive_right: mark.inclusive_right,
                anchor: mark.anchor,
            })
            .collect()
    }

    /// Serialize to tagged markup, joining lines with `line_break`
    /// (`<br />` when `None`).
    pub fn export(&self, line_break: Option<&str>) -> String {
        let markup = export::to_html(self, line_break.unwrap_or(DEFAULT_LINE_BREAK));
        debug!("export {} lines, {} bytes", self.line_count(), markup.len());
        markup
    }

    /// Build a document from tagged markup using the default tag table.
    pub fn import(markup: &str) -> Result<Self> {
        Self::import_with(markup, TagMap::default())
    }

    pub fn import_with(markup: &str, tags: TagMap) -> Result<Self> {
        let state = import::from_html(markup, &tags);
        let mut doc = Self::with_tags(tags);
        doc.set_state(&state)?;
        Ok(doc)
    }

    /// Replace the content with `markup` read through a named format.
    pub fn load(&mut self, markup: &str, format: &str, registry: &FormatRegistry) -> Result<()> {
        let state = registry.import(format, markup, &self.tags)?;
        self.set_state(&state)
    }

    /// Replace the whole document.
    ///
    /// Inline markers grow at their end like toggled marks, so touching
    /// markers of one class stay disjoint as text is typed. Block entries
    /// name a heading (`h1`..`h6`) or a list kind (`ordered`, `unordered`,
    /// or `li` for an unordered item). Everything is validated before the
    /// document is touched.
    pub fn set_value(&mut self, text: &str, markers: &[Marker], blocks: &[Marker]) -> Result<()> {
        let next = Buffer::new(text);
        let markers = markers
            .iter()
            .map(|m| Ok((m.class_name.parse::<InlineClass>()?, m.range())))
            .collect::<Result<Vec<_>>>()?;
        let blocks = blocks
            .iter()
            .map(|b| Ok((BlockSpec::parse(&b.class_name)?, b.range())))
            .collect::<Result<Vec<_>>>()?;
        let last = next.line_count() - 1;
        let ranges = markers.iter().map(|(_, r)| r).chain(blocks.iter().map(|(_, r)| r));
        for range in ranges {
            if range.end.line > last {
                return Err(EditorError::InvalidPosition {
                    line: range.end.line,
                    ch: range.end.ch,
                });
            }
        }

        self.marks.clear();
        self.blocks.clear_all();
        self.images.clear();
        let compiled = commands::compile_bytes(&self.buffer, 0..self.buffer.len(), &next.text())?;
        self.apply_compiled(compiled, Origin::SetValue, Stickiness::Inclusivity)?;
        self.cursor = Cursor::default();

        for (class, range) in &markers {
            let start = self.buffer.offset_of(range.start)?;
            let end = self.buffer.offset_of(range.end)?;
            if start < end {
                self.marks.add(MarkClass::Inline(*class), start..end, false, true);
            }
        }
        for (entry, range) in &blocks {
            for line in range.lines() {
                match entry {
                    BlockSpec::Heading(class) => self.blocks.set(line, *class),
                    BlockSpec::List(kind) => {
                        if !lists::is_list_line(self, line) {
                            lists::insert_sentinel(self, line, *kind)?;
                        }
                    }
                }
            }
        }

        self.history.clear();
        lists::renumber(self);
        debug!(
            "set value: {} lines, {} markers, {} blocks",
            self.line_count(),
            markers.len(),
            blocks.len()
        );
        Ok(())
    }

    pub fn set_state(&mut self, state: &DocumentState) -> Result<()> {
        self.set_value(&state.value, &state.markers, &state.blocks)
    }

    pub fn from_state(state: &DocumentState) -> Result<Self> {
        let mut doc = Self::new();
        doc.set_state(state)?;
        Ok(doc)
    }

    /// Snapshot as persisted state. Sentinels are stripped, list lines
    /// become `ordered`/`unordered` blocks and headings become `hN` blocks.
    pub fn to_state(&self) -> DocumentState {
        let items = lists::items(self);
        let is_list = |line: usize| items.iter().any(|item| item.line == line);
        let strip = |pos: Position| {
            if is_list(pos.line) && pos.ch > 0 {
                Position::new(pos.line, pos.ch - 1)
            } else {
                pos
            }
        };

        let value = (0..self.line_count())
            .map(|line| {
                let text = self.buffer.line(line).unwrap_or_default();
                if is_list(line) {
                    text.chars().skip(1).collect()
                } else {
                    text.into_owned()
                }
            })
            .collect::<Vec<String>>()
            .join("\n");

        let markers = self
            .marks
            .iter()
            .filter(|m| !m.anchor && !m.is_empty())
            .filter_map(|m| {
                let class = m.class.inline()?;
                Some(Marker::new(
                    class.as_str(),
                    strip(self.buffer.position_of(m.range.start)),
                    strip(self.buffer.position_of(m.range.end)),
                ))
            })
            .collect();

        let mut lines: Vec<(usize, String)> = self
            .blocks
            .iter()
            .map(|(line, class)| (line, class.to_string()))
            .chain(items.iter().map(|item| (item.line, item.kind.to_string())))
            .collect();
        lines.sort();

        let mut blocks: Vec<Marker> = Vec::new();
        for (line, class_name) in lines {
            let end = strip(Position::new(line, self.buffer.line_len(line)));
            match blocks.last_mut() {
                Some(block) if block.class_name == class_name && block.end.line + 1 == line => {
                    block.end = end;
                }
                _ => blocks.push(Marker::new(class_name, (line, 0), end)),
            }
        }

        DocumentState {
            value,
            markers,
            blocks,
        }
    }
}

/// Line class named by a persisted block entry.
enum BlockSpec {
    Heading(BlockClass),
    List(ListKind),
}

impl BlockSpec {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "li" => Ok(BlockSpec::List(ListKind::Unordered)),
            "ordered" | "unordered" => Ok(BlockSpec::List(name.parse()?)),
            _ => Ok(BlockSpec::Heading(name.parse()?)),
        }
    }
}
