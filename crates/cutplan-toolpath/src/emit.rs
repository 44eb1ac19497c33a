//! G-code line emission with the two modal policies.
//!
//! The verbose policy writes every axis and feed word on every command;
//! the optimized policy only writes a word when its value differs from
//! the last emitted value, and drops a command entirely when all of its
//! words collapse.

use cutplan_core::{format_coord, sanitize_annotation, GeneratorVersion};

use crate::state::{MachineState, COORD_EPSILON};

/// Compensation side, mapped from the cut type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompSide {
    /// G41, used for external contours.
    Left,
    /// G42, used for internal contours.
    Right,
}

pub(crate) struct Emitter {
    version: GeneratorVersion,
    include_comments: bool,
    lines: Vec<String>,
    pub state: MachineState,
}

impl Emitter {
    pub fn new(version: GeneratorVersion, include_comments: bool) -> Self {
        Self {
            version,
            include_comments,
            lines: Vec::new(),
            state: MachineState::new(),
        }
    }

    fn push(&mut self, command: String, comment: Option<&str>) {
        match comment {
            Some(c) if self.include_comments => {
                self.lines.push(format!("{command} ; {}", sanitize_annotation(c)));
            }
            _ => self.lines.push(command),
        }
    }

    /// Verbatim line, e.g. header and trailer commands. Not subject to
    /// modal suppression and does not touch the machine state.
    pub fn raw(&mut self, command: &str, comment: Option<&str>) {
        self.push(command.to_string(), comment);
    }

    /// Standalone comment line.
    pub fn comment(&mut self, text: &str) {
        if self.include_comments {
            self.lines.push(format!("; {}", sanitize_annotation(text)));
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn wants(&self, target: Option<f64>, current: f64) -> Option<f64> {
        let target = target?;
        match self.version {
            GeneratorVersion::Verbose => Some(target),
            GeneratorVersion::Optimized => {
                ((target - current).abs() >= COORD_EPSILON).then_some(target)
            }
        }
    }

    /// Emits a rapid move (G0). Returns the distance travelled.
    pub fn rapid(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        comment: Option<&str>,
    ) -> f64 {
        let mut words = String::from("G0");
        let mut any = false;
        for (letter, target, current) in [
            ('X', x, self.state.x),
            ('Y', y, self.state.y),
            ('Z', z, self.state.z),
        ] {
            if let Some(v) = self.wants(target, current) {
                words.push_str(&format!(" {letter}{}", format_coord(v)));
                any = true;
            }
        }
        if !any {
            return 0.0;
        }
        let distance = self.state.distance_to(x, y, z);
        self.state.apply(x, y, z);
        self.push(words, comment);
        distance
    }

    /// Emits a feed move (G1) at `feed` mm/min. Returns the distance
    /// travelled.
    pub fn cut(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        feed: f64,
        comment: Option<&str>,
    ) -> f64 {
        let mut words = String::from("G1");
        let mut any = false;
        for (letter, target, current) in [
            ('X', x, self.state.x),
            ('Y', y, self.state.y),
            ('Z', z, self.state.z),
        ] {
            if let Some(v) = self.wants(target, current) {
                words.push_str(&format!(" {letter}{}", format_coord(v)));
                any = true;
            }
        }
        if !any {
            return 0.0;
        }

        let feed_changed = self
            .state
            .active_feed
            .map_or(true, |f| (f - feed).abs() >= COORD_EPSILON);
        if self.version == GeneratorVersion::Verbose || feed_changed {
            words.push_str(&format!(" F{}", format_coord(feed)));
        }

        let distance = self.state.distance_to(x, y, z);
        self.state.apply(x, y, z);
        self.state.active_feed = Some(feed);
        self.push(words, comment);
        distance
    }

    /// Activates tool compensation on the given side.
    pub fn comp_on(&mut self, side: CompSide, tool_number: u8, comment: Option<&str>) {
        let code = match side {
            CompSide::Left => "G41",
            CompSide::Right => "G42",
        };
        self.push(format!("{code} D{tool_number}"), comment);
        self.state.compensation_active = true;
    }

    /// Cancels tool compensation.
    pub fn comp_off(&mut self, comment: Option<&str>) {
        self.push("G40".to_string(), comment);
        self.state.compensation_active = false;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn finish(self) -> String {
        let mut program = self.lines.join("\n");
        program.push('\n');
        program
    }
}
