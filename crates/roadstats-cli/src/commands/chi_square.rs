//! Chi-square command - test a 2x2 table given on the command line.

use colored::Colorize;
use roadstats::{ChiSquareResult, ContingencyTable, chi_square_independence};
use serde_json::json;

use super::{CommandResult, Context, print_json};

pub fn run(ctx: &Context, counts: Vec<f64>) -> CommandResult {
    let &[a, b, c, d] = counts.as_slice() else {
        return Err(format!("Expected 4 counts, got {}", counts.len()).into());
    };
    if counts.iter().any(|v| *v < 0.0 || !v.is_finite()) {
        return Err("Counts must be finite and non-negative".into());
    }

    let table = ContingencyTable::new(a, b, c, d);
    let result = chi_square_independence(&table);

    if ctx.json {
        return print_json(&json!({
            "observed": table,
            "result": result,
        }));
    }

    print_table(&table, &result.expected, ["Group 1", "Group 2"]);
    println!();
    print_result(&result);

    Ok(())
}

/// Observed counts with expected counts in parentheses.
pub fn print_table(observed: &ContingencyTable, expected: &ContingencyTable, labels: [&str; 2]) {
    println!(
        "  {:14} {} {}",
        "",
        format!("{:>22}", "Present").bold(),
        format!("{:>22}", "Absent").bold()
    );
    for (i, label) in labels.iter().enumerate() {
        print!("  {:14}", label);
        for j in 0..2 {
            print!(
                " {:>12.0} {}",
                observed.get(i, j),
                format!("{:>9}", format!("({:.1})", expected.get(i, j))).dimmed()
            );
        }
        println!();
    }
}

pub fn print_result(result: &ChiSquareResult) {
    println!("  chi2 = {:.4}", result.chi2);
    let p = format!("p = {:.4}", result.p);
    if result.is_significant(0.05) {
        println!("  {} {}", p.green().bold(), "(significant at 0.05)".green());
    } else {
        println!("  {} {}", p, "(not significant at 0.05)".dimmed());
    }
}
