//! Terminal output for command responses and notices.

use colored::Colorize;
use grievance_core::{
    ChartData, ChartStyle, FileDetails, Notice, NoticeLevel, Response, SearchOutcome,
};

const BAR_WIDTH: usize = 40;

/// Prints a notice to stderr, colored by level.
pub fn notice(notice: &Notice) {
    let title = match notice.level {
        NoticeLevel::Info => notice.title.green().bold(),
        NoticeLevel::Warning => notice.title.yellow().bold(),
    };
    eprintln!("{title}: {}", notice.message);
}

/// Prints the payload of a response; notice-only responses print nothing.
pub fn response(response: &Response, quiet: bool) {
    match response {
        Response::Uploaded(receipt) if quiet => println!("{}", receipt.filename),
        Response::Search {
            outcome: SearchOutcome::Matches(filenames),
            ..
        } => {
            for filename in filenames {
                println!("{filename}");
            }
        }
        Response::Details(details) => print_details(details, quiet),
        Response::Keywords { keywords } => {
            for keyword in keywords {
                println!("{}", keyword.keyword);
            }
        }
        Response::KeywordAdded(keyword) if !quiet => {
            println!("Added keyword '{}'", keyword.keyword.cyan());
        }
        Response::KeywordDeleted { keyword } if !quiet => {
            println!("Deleted keyword '{}'", keyword.cyan());
        }
        Response::Detached {
            filename, name, ..
        } if !quiet => println!("Detached '{}' from '{}'", name.cyan(), filename),
        Response::Years { years } => {
            for year in years {
                println!("{year}");
            }
        }
        Response::Chart(chart) => print_chart(chart, quiet),
        _ => {}
    }
}

fn print_details(details: &FileDetails, quiet: bool) {
    let file = &details.file;
    if quiet {
        println!("{}\t{}\t{}\t{}", file.filename, file.location, file.year, file.pay_period);
        return;
    }

    println!("{}", file.filename.bold());
    println!("  Location:   {}", file.location);
    println!("  Year:       {}", file.year);
    println!("  Pay period: {}", file.pay_period);
    println!("  Keywords:   {}", join_or_none(&details.keywords));
    println!("  Persons:    {}", join_or_none(&details.persons));
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".dimmed().to_string()
    } else {
        items.join(", ")
    }
}

fn print_chart(chart: &ChartData, quiet: bool) {
    if !quiet {
        println!("{}", chart.title.bold());
    }
    if chart.is_empty() {
        if !quiet {
            println!("  {}", "no data".dimmed());
        }
        return;
    }

    let label_width = chart
        .entries
        .iter()
        .map(|entry| entry.label.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = chart
        .entries
        .iter()
        .map(|entry| entry.count)
        .max()
        .unwrap_or(0);

    for entry in &chart.entries {
        let (length, value) = match chart.style {
            ChartStyle::Bar => (scaled(entry.count, max_count), entry.count.to_string()),
            ChartStyle::Pie => (
                (entry.share * BAR_WIDTH as f64).round() as usize,
                entry.percent_label(),
            ),
        };
        if quiet {
            println!("{}\t{value}", entry.label);
        } else {
            println!(
                "  {:<label_width$}  {} {value}",
                entry.label,
                "█".repeat(length).cyan()
            );
        }
    }
}

fn scaled(count: u64, max_count: u64) -> usize {
    if max_count == 0 {
        return 0;
    }
    ((count as f64 / max_count as f64) * BAR_WIDTH as f64).round() as usize
}
