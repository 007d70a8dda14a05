use crate::{Effect, RunEvent, RunFailure, RunPhase, RunState};

/// Pure update function: applies an event to the run state and returns the
/// effects the executor must perform next.
///
/// Events that do not fit the current phase are ignored. Every path into a
/// terminal phase ends with [`Effect::Cleanup`].
pub fn update(mut state: RunState, event: RunEvent) -> (RunState, Vec<Effect>) {
    if state.phase().is_terminal() {
        return (state, Vec::new());
    }

    let effects = match (state.phase(), event) {
        (RunPhase::Init, RunEvent::Start { target_count }) => {
            state.begin(target_count);
            vec![Effect::Download { target_count }]
        }
        (_, RunEvent::SetupFailed { message }) => fail(&mut state, RunFailure::Setup { message }),
        (RunPhase::Downloading, RunEvent::DownloadsFinished { count }) => {
            if count == 0 {
                fail(&mut state, RunFailure::NoDownloads)
            } else {
                state.downloads_done(count);
                vec![Effect::Upload]
            }
        }
        (
            RunPhase::Uploading,
            RunEvent::UploadsFinished {
                count,
                insufficient_balance,
            },
        ) => {
            if count == 0 {
                fail(
                    &mut state,
                    RunFailure::NoUploads {
                        insufficient_balance,
                    },
                )
            } else {
                state.uploads_done(count);
                vec![Effect::Publish]
            }
        }
        (
            RunPhase::Publishing,
            RunEvent::Published {
                manifest_id,
                gallery_url,
            },
        ) => {
            state.succeed(manifest_id, gallery_url);
            vec![Effect::WriteReport, Effect::Cleanup]
        }
        (
            RunPhase::Publishing,
            RunEvent::PublishFailed {
                message,
                insufficient_balance,
            },
        ) => fail(
            &mut state,
            RunFailure::Publish {
                message,
                insufficient_balance,
            },
        ),
        _ => Vec::new(),
    };

    (state, effects)
}

fn fail(state: &mut RunState, failure: RunFailure) -> Vec<Effect> {
    let mut effects = vec![Effect::ReportFailure {
        failure: failure.clone(),
    }];
    if failure.needs_funding() {
        effects.push(Effect::FundingHint);
    }
    effects.push(Effect::Cleanup);
    state.fail(failure);
    effects
}
