use std::time::Duration;

use auric_core::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridAction {
    Up,
    Down,
    Left,
    Right,
}

/// A `rows × columns` table of text cells walked with the arrow keys.
///
/// Moving announces the cell value followed by its `row, column`
/// coordinates. A move off the edge plays the boundary cue and repeats the
/// current cell.
pub struct Grid {
    key: String,
    label: String,
    cells: Vec<Vec<String>>,
    columns: usize,
    row: usize,
    column: usize,
    keys: Dispatcher<GridAction>,
    sounds: SoundSet,
}

impl Grid {
    pub fn new(label: impl Into<String>, rows: usize, columns: usize) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::Empty("grid"));
        }
        let mut keys = Dispatcher::new();
        keys.bind_motion(Motion::Up, GridAction::Up);
        keys.bind_motion(Motion::Down, GridAction::Down);
        keys.bind_motion(Motion::Left, GridAction::Left);
        keys.bind_motion(Motion::Right, GridAction::Right);
        Ok(Self {
            key: String::new(),
            label: label.into(),
            cells: vec![vec![String::new(); columns]; rows],
            columns,
            row: 0,
            column: 0,
            keys,
            sounds: SoundSet::default(),
        })
    }

    pub fn with_sounds(mut self, sounds: SoundSet) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.keys.set_repeat_interval(config.repeat_interval());
        self
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(row, column)` of the active cell.
    pub fn coordinates(&self) -> (usize, usize) {
        (self.row, self.column)
    }

    /// Row-major index of the active cell.
    pub fn index(&self) -> usize {
        self.row * self.columns + self.column
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(row)?.get(column).map(String::as_str)
    }

    /// Returns false when the coordinates are outside the grid.
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(column)) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        let (row, column) = (self.row, self.column);
        self.set_cell(row, column, value);
    }

    /// Inserts a blank row before `index`, clamped to the end.
    pub fn insert_row(&mut self, index: usize) {
        let index = index.min(self.cells.len());
        self.cells.insert(index, vec![String::new(); self.columns]);
    }

    /// Inserts a blank column before `index`, clamped to the end.
    pub fn insert_column(&mut self, index: usize) {
        let index = index.min(self.columns);
        for row in &mut self.cells {
            row.insert(index, String::new());
        }
        self.columns += 1;
    }

    fn describe(&self) -> String {
        let value = self.cell(self.row, self.column).unwrap_or_default();
        let value = if value.is_empty() { "blank" } else { value };
        format!("{value} {}, {}", self.row, self.column)
    }

    fn step(&mut self, action: GridAction) -> Feedback {
        let (row, column) = (self.row, self.column);
        let target = match action {
            GridAction::Up => row.checked_sub(1).map(|r| (r, column)),
            GridAction::Down => (row + 1 < self.rows()).then_some((row + 1, column)),
            GridAction::Left => column.checked_sub(1).map(|c| (row, c)),
            GridAction::Right => (column + 1 < self.columns).then_some((row, column + 1)),
        };
        match target {
            Some((row, column)) => {
                self.row = row;
                self.column = column;
                Feedback::say(self.describe()).with_cue(Cue::Scroll)
            }
            None => Feedback::say(self.describe()).with_cue(Cue::Boundary),
        }
    }
}

impl Handler for Grid {
    type Action = GridAction;

    fn dispatcher(&mut self) -> &mut Dispatcher<GridAction> {
        &mut self.keys
    }

    fn invoke(&mut self, call: Invocation<GridAction>, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        let before = self.index();
        let feedback = self.step(call.action);
        cx.emit(&feedback, &self.sounds);
        if self.index() == before {
            return Ok(Outcome::Handled);
        }
        Ok(Outcome::Changed(self.index()))
    }
}

impl Unit for Grid {
    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn role(&self) -> Role {
        Role::Grid
    }

    fn value(&self) -> String {
        self.cell(self.row, self.column).unwrap_or_default().to_owned()
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        cx.speak(&self.name(), interrupt);
        cx.speak(&self.describe(), false);
        cx.push_handler(self.keys.id());
        Ok(true)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        pump_repeats(self, dt, cx)
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        cx.pop_handler(self.keys.id());
        Ok(true)
    }

    /// Back to the first cell with every value cleared.
    fn reset(&mut self) {
        self.row = 0;
        self.column = 0;
        for cell in self.cells.iter_mut().flatten() {
            cell.clear();
        }
    }

    fn dispatch(
        &mut self,
        target: DispatcherId,
        event: &InputEvent,
        cx: &mut FocusCx<'_>,
    ) -> FocusResult<Outcome> {
        if target != self.keys.id() {
            return Ok(Outcome::Ignored);
        }
        deliver(self, event, cx)
    }
}
