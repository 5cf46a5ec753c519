//! Ordered merge of harmony events into a measure-structured score

use num_traits::Zero;

use super::events::HarmonyEvent;
use crate::score::{Element, Measure, QuarterLength, Score};

/// Copy `score` with its harmony annotations replaced by `events`.
///
/// Events must be in increasing offset order. Within each measure the notes
/// and rests are walked in offset order, elements sharing an offset keeping
/// their stored order; an event goes in front of the first element whose
/// offset is not earlier than the event. Events past the
/// last element stay in the measure they fall in, and the final measure takes
/// whatever is left.
pub fn merge_into_score(score: &Score, events: &[HarmonyEvent]) -> Score {
    let mut pending = events.iter().peekable();
    let last = score.measures.len().saturating_sub(1);

    let measures = score
        .measures
        .iter()
        .enumerate()
        .map(|(i, measure)| {
            let mut source = measure.without_harmony();
            let mut walk = std::mem::take(&mut source.elements);
            walk.sort_by_key(Element::offset);
            let mut elements = Vec::with_capacity(walk.len());

            for element in walk {
                while let Some(event) =
                    pending.next_if(|e| relative_offset(measure, e) <= element.offset())
                {
                    elements.push(Element::harmony(relative_offset(measure, event), &event.symbol));
                }
                elements.push(element);
            }

            let end = measure.end();
            while let Some(event) = pending.next_if(|e| i == last || e.offset < end) {
                elements.push(Element::harmony(relative_offset(measure, event), &event.symbol));
            }

            Measure {
                elements,
                ..source
            }
        })
        .collect();

    Score {
        metadata: score.metadata.clone(),
        measures,
    }
}

/// Event offset relative to `measure`, never before its start.
fn relative_offset(measure: &Measure, event: &HarmonyEvent) -> QuarterLength {
    let relative = event.offset - measure.offset;
    if relative < QuarterLength::zero() {
        QuarterLength::zero()
    } else {
        relative
    }
}
