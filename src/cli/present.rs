use std::io::{self, Write};

use mealgen_planner::{Block, PlanView};

/// Writes a rendered plan as plain terminal text.
pub fn write_plan<W: Write>(out: &mut W, view: &PlanView) -> io::Result<()> {
    write_section(out, "Your Meal Plan", &view.meal_plan)?;

    if !view.shopping_list.is_empty() {
        writeln!(out)?;
        write_section(out, "Shopping List", &view.shopping_list)?;
    }

    Ok(())
}

fn write_section<W: Write>(out: &mut W, title: &str, blocks: &[Block]) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "#".repeat(title.chars().count()))?;
    writeln!(out)?;

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let underline = match level {
                    2 => '=',
                    3 => '-',
                    _ => '~',
                };
                writeln!(out, "{text}")?;
                writeln!(out, "{}", underline.to_string().repeat(text.chars().count()))?;
            }
            Block::BoldLabel { text } | Block::Paragraph { text } => writeln!(out, "{text}")?,
            Block::BulletItem { text } => writeln!(out, "  • {text}")?,
            Block::Table { header, rows } => write_table(out, header, rows)?,
            Block::Spacer => writeln!(out)?,
        }
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, header: &[String], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, header, &widths)?;
    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(out, "{}", separator.join("-+-"))?;
    for row in rows {
        write_row(out, row, &widths)?;
    }

    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}
