use crate::cli::AlignArgs;
use crate::error::Result;
use modloc::engine::alignment::{self, Alignment};
use std::io::Write;
use tracing::info;

pub fn run(args: AlignArgs) -> Result<()> {
    info!(
        "Aligning {} position(s) onto {} target(s).",
        args.from.len(),
        args.to.len()
    );
    let alignment = if args.all {
        alignment::align_all(&args.from, &args.to)
    } else {
        alignment::align(&args.from, &args.to)
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render(&alignment).as_bytes())?;
    Ok(())
}

fn render(alignment: &Alignment) -> String {
    alignment
        .iter()
        .map(|(from, to)| match to {
            Some(to) => format!("{from} -> {to}\n"),
            None => format!("{from} -> -\n"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_marks_unplaced_positions() {
        let alignment = alignment::align(&[1, 6, 9], &[2, 8]);
        assert_eq!(render(&alignment), "1 -> 2\n6 -> -\n9 -> 8\n");
    }
}
