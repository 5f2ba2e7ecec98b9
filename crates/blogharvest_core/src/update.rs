use crate::{Effect, MetadataFormat, Msg, RunPhase, RunState};

/// Pure update function: applies a message to the run state and returns the
/// effects the orchestrator must perform next.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    if state.is_exhausted() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::FeedResolved {
            feed_url,
            paginated,
        } => {
            if state.phase() != RunPhase::ResolvingFeed {
                return (state, Vec::new());
            }
            state.start_paginating(feed_url, paginated);
            fetch_current(&mut state)
        }
        Msg::PageFetched { items, entries } => {
            if items == 0 || (entries == 0 && !state.cursor().is_paginated()) {
                return exhaust(state);
            }
            state.begin_page(items);
            let first_sequence = state.reserve_sequence(entries);
            vec![Effect::ProcessPage {
                first_sequence,
                count: entries,
            }]
        }
        Msg::PageFailed => return exhaust(state),
        Msg::PageJoined => {
            state.finish_page();
            let mut effects = Vec::new();
            if state.debug() {
                effects.push(Effect::PersistMetadata {
                    format: MetadataFormat::Csv,
                });
            }
            if state.has_more_pages() {
                effects.extend(fetch_current(&mut state));
            } else {
                state.exhaust();
                effects.push(Effect::PersistMetadata {
                    format: MetadataFormat::Json,
                });
            }
            effects
        }
    };

    (state, effects)
}

fn fetch_current(state: &mut RunState) -> Vec<Effect> {
    match state.current_page_url() {
        Some(url) => vec![Effect::FetchPage { url }],
        None => {
            state.exhaust();
            vec![Effect::PersistMetadata {
                format: MetadataFormat::Json,
            }]
        }
    }
}

fn exhaust(mut state: RunState) -> (RunState, Vec<Effect>) {
    state.exhaust();
    (
        state,
        vec![Effect::PersistMetadata {
            format: MetadataFormat::Json,
        }],
    )
}
