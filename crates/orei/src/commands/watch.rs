//! Watch command handler: poll the matrix and print each state change.

use std::time::Duration;

use orei_core::{Coordinator, CoordinatorEvent, MatrixConfig, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::status::StatusView;

fn render(view: &StatusView, global: &GlobalOpts, color: bool) -> Result<String, CliError> {
    // One record per line regardless of the requested JSON style.
    let format = match global.output {
        OutputFormat::Json => &OutputFormat::JsonCompact,
        ref other => other,
    };
    output::render_single(format, view, |v| v.summary(color), StatusView::plain)
}

pub async fn handle(
    mut matrix: MatrixConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(secs) = args.interval {
        matrix.scan_interval = Duration::from_secs(secs.max(1));
    }

    let coordinator = Coordinator::new(matrix)?;
    coordinator.connect().await?;

    coordinator.add_listener(|event| {
        if let CoordinatorEvent::UpdateFailed { error } = event {
            eprintln!("update failed: {error}");
        }
    });

    let color = output::should_color(&global.color);
    let title = coordinator.device_info().map(|info| info.title());
    let view_of = |snap: &Snapshot| StatusView::new(snap, &coordinator.update_status(), title.clone());

    let mut stream = coordinator.subscribe();
    let mut last: Option<StatusView> = None;
    let mut printed = 0_usize;
    let mut next = stream.current().cloned();

    loop {
        if let Some(snap) = next.take() {
            let view = view_of(&snap);
            if last.as_ref().is_none_or(|prev| !prev.same_state(&view)) {
                output::print_output(&render(&view, global, color)?, global.quiet);
                printed += 1;
                last = Some(view);
            }
        }

        if args.count.is_some_and(|limit| printed >= limit) {
            break;
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = stream.changed() => match changed {
                Some(snap) => next = Some(snap),
                None => break,
            },
        }
    }

    coordinator.shutdown().await;
    Ok(())
}
