use serde::Serialize;

use super::state::Ticks;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Subject {
    Process(String),
    Idle,
    ContextSwitch,
}

impl Subject {
    pub fn label(&self) -> &str {
        match self {
            Subject::Process(id) => id,
            Subject::Idle => "IDLE",
            Subject::ContextSwitch => "CS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Execution,
    Overshoot,
    Idle,
    Overhead,
}

/// Half-open interval `[start, end)` on one timeline row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub subject: Subject,
    pub start: Ticks,
    pub end: Ticks,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, subject: Subject, start: Ticks, end: Ticks, kind: SegmentKind) {
        debug_assert!(start < end, "Empty segment [{start}, {end}) for {subject:?}");
        self.segments.push(Segment {
            subject,
            start,
            end,
            kind,
        });
    }

    // Whatever part of the span lies at or past the deadline is overshoot.
    pub fn record_execution(&mut self, id: &str, start: Ticks, end: Ticks, deadline: Ticks) {
        let subject = Subject::Process(id.to_owned());
        if end <= deadline {
            self.push(subject, start, end, SegmentKind::Execution);
        } else if start >= deadline {
            self.push(subject, start, end, SegmentKind::Overshoot);
        } else {
            self.push(subject.clone(), start, deadline, SegmentKind::Execution);
            self.push(subject, deadline, end, SegmentKind::Overshoot);
        }
    }

    pub fn record_idle(&mut self, start: Ticks, end: Ticks) {
        self.push(Subject::Idle, start, end, SegmentKind::Idle);
    }

    pub fn record_overhead(&mut self, subject: Subject, start: Ticks, end: Ticks) {
        self.push(subject, start, end, SegmentKind::Overhead);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn row<'a>(&'a self, subject: &'a Subject) -> impl Iterator<Item = &'a Segment> + 'a {
        self.segments.iter().filter(move |seg| &seg.subject == subject)
    }

    // CPU time actually spent on the process, in or past its deadline
    pub fn executed(&self, id: &str) -> Ticks {
        let subject = Subject::Process(id.to_owned());
        self.row(&subject)
            .filter(|seg| matches!(seg.kind, SegmentKind::Execution | SegmentKind::Overshoot))
            .map(Segment::len)
            .sum()
    }

    /// The segments of one row, sorted, with every gap up to `horizon`
    /// filled by an `Idle` segment so the row covers `[0, horizon)` exactly.
    pub fn tiled_row(&self, subject: &Subject, horizon: Ticks) -> Vec<Segment> {
        let mut own: Vec<&Segment> = self.row(subject).collect();
        own.sort_by_key(|seg| seg.start);

        let mut tiled = Vec::with_capacity(own.len() * 2 + 1);
        let mut cursor = 0;
        for seg in own {
            debug_assert!(seg.start >= cursor, "Overlapping segments on row {subject:?}");
            if seg.start > cursor {
                tiled.push(Segment {
                    subject: subject.clone(),
                    start: cursor,
                    end: seg.start,
                    kind: SegmentKind::Idle,
                });
            }
            tiled.push(seg.clone());
            cursor = seg.end;
        }
        if cursor < horizon {
            tiled.push(Segment {
                subject: subject.clone(),
                start: cursor,
                end: horizon,
                kind: SegmentKind::Idle,
            });
        }
        tiled
    }
}
