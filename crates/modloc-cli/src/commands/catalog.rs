use crate::error::Result;
use modloc::core::models::catalog::known_modifications;
use std::io::Write;

pub fn run() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render().as_bytes())?;
    Ok(())
}

fn render() -> String {
    let mut table = format!("{:<20} {:>12}\n", "name", "mass (Da)");
    for (name, mass) in known_modifications() {
        table.push_str(&format!("{name:<20} {mass:>12.6}\n"));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_every_known_modification() {
        let table = render();
        assert_eq!(table.lines().count(), known_modifications().len() + 1);
        assert!(
            table
                .lines()
                .any(|line| line.starts_with("phosphorylation") && line.ends_with("79.966331"))
        );
    }
}
