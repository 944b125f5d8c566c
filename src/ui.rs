// UI layer: a simple interactive menu using `dialoguer`. Each pass through
// the loop collects the inputs for one menu item, hands a single `Action`
// to the controller and prints the rendered outcome.

use crate::recommend::TextModel;
use crate::reviews::{stars, ReviewStore};
use crate::view::{render, Action, Controller, MenuItem, Outcome};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use std::time::Duration;

const EXIT_LABEL: &str = "종료";
const DEFAULT_RATING: i32 = 3;

/// Main interactive menu. Runs until the user picks "종료".
///
/// Note: `Select::interact()` is keyboard-driven: use the arrow keys and
/// Enter to choose an option.
pub fn main_menu<M, S, R>(controller: &mut Controller<M, S, R>) -> Result<()>
where
    M: TextModel,
    S: ReviewStore,
    R: Rng,
{
    println!("{}", "AI 책 추천기".bold());
    let mut items: Vec<&str> = MenuItem::ALL.iter().map(|m| m.label()).collect();
    items.push(EXIT_LABEL);

    loop {
        let selection = Select::new()
            .with_prompt("원하는 메뉴를 선택하세요")
            .items(&items)
            .default(0)
            .interact()?;
        let Some(item) = MenuItem::ALL.get(selection).copied() else {
            break;
        };

        match item {
            MenuItem::Genre(category) => {
                let keyword = read_line(&format!(
                    "'{}' 장르에서 원하는 키워드를 입력하세요",
                    category.label()
                ))?;
                let out = with_spinner("AI가 책을 추천 중입니다...", || {
                    controller.handle(Action::Recommend { category, keyword })
                });
                show(&out);
            }
            MenuItem::Workbook => {
                let subject =
                    read_line("어떤 과목의 문제집을 찾고 있나요? (예: 수학, 영어, 과학 등)")?;
                let out = with_spinner("AI가 문제집을 찾는 중입니다...", || {
                    controller.handle(Action::Workbook { subject })
                });
                show(&out);
            }
            MenuItem::WriteReview => {
                println!("{}", "책 리뷰 쓰기".bold());
                let title = read_line("책 제목")?;
                let review = read_block("감상평 (빈 줄을 입력하면 끝납니다)")?;
                let rating = read_rating()?;
                if Confirm::new().with_prompt("리뷰 저장").default(true).interact()? {
                    show(&controller.handle(Action::SubmitReview { title, review, rating }));
                }
            }
            MenuItem::ViewReview => loop {
                let out = controller.handle(Action::ShowReview);
                show(&out);
                if !matches!(out, Outcome::Review(_)) {
                    break;
                }
                if !Confirm::new()
                    .with_prompt("다른 리뷰 보기")
                    .default(false)
                    .interact()?
                {
                    break;
                }
            },
        }
        println!("---");
    }
    Ok(())
}

/// Print an outcome, coloured by kind.
fn show(out: &Outcome) {
    let text = render(out);
    match out {
        Outcome::Nothing => {}
        Outcome::Recommendation { .. } => println!("{}", text),
        Outcome::Saved => println!("{}", text.as_str().green()),
        Outcome::Warning(_) => println!("{}", text.as_str().yellow()),
        Outcome::Error(_) => println!("{}", text.as_str().red()),
        Outcome::Info(_) => println!("{}", text.as_str().cyan()),
        Outcome::Review(_) => println!("{}", text),
    }
}

/// Run `f` while a spinner ticks, then clear it.
fn with_spinner<T>(msg: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

fn read_line(prompt: &str) -> Result<String> {
    let line: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(line)
}

/// Multi-line entry: lines are collected until an empty one.
fn read_block(prompt: &str) -> Result<String> {
    println!("{}", prompt);
    let mut lines = Vec::new();
    loop {
        let line = read_line(">")?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Star picker standing in for a 1..=5 slider.
fn read_rating() -> Result<i32> {
    let choices: Vec<String> = (1..=5).map(|n| format!("{} ({})", stars(n), n)).collect();
    let idx = Select::new()
        .with_prompt("별점")
        .items(&choices)
        .default((DEFAULT_RATING - 1) as usize)
        .interact()?;
    Ok(idx as i32 + 1)
}
