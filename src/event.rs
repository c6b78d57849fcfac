//! Events produced while a cylinder is played.

/// Something that happened during playback, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The first line of the cylinder was read, empty titles become `"Untitled"`.
    TitleResolved(String),
    /// Playback of the body starts at this tempo.
    PlaybackStarted { bpm: u32 },
    /// A tempo directive was read. Carries the tempo in effect afterwards.
    TempoChanged(u32),
    /// A note symbol (including the rest `-`) is about to be played.
    NoteVisual(char),
    /// A bar line. Takes no time.
    BarVisual,
    /// A tone handed to the emitter. A frequency of zero is a rest.
    Tone { frequency: f64, duration_ms: u32 },
    /// Emitted after every 16th note of a song for readability.
    LineBreakHint,
    /// The cylinder ran out.
    PlaybackFinished { notes: usize },
}

/// Receives every event of a playback pass.
pub trait Observer {
    fn notify(&mut self, event: &Event);
}

/// Collects all events, mostly useful for inspecting a pass after the fact.
impl Observer for Vec<Event> {
    fn notify(&mut self, event: &Event) {
        self.push(event.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vectors_record() {
        let mut events: Vec<Event> = Vec::new();
        events.notify(&Event::TempoChanged(90));
        events.notify(&Event::LineBreakHint);
        assert_eq!(events, vec![Event::TempoChanged(90), Event::LineBreakHint]);
    }
}
