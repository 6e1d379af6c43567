//! A terminal front-end for the task server.
//!
//! The server URL is read from the `TASKBOARD_API_URL` environment variable, or from the first argument. \
//! Set the `RUST_LOG` environment variable to display more info about what is going on.

use std::error::Error;
use std::io::{stdin, stdout, BufRead, Write};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use taskboard::{ApiClient, SyncCoordinator};
use taskboard::coordinator::progress::{feedback_channel, FeedbackReceiver};
use taskboard::task::{Frequency, TaskFilter, TaskId, TaskStatus};
use taskboard::traits::UserPrompt;
use taskboard::utils::{print_calendar, print_form, print_task_list};

const HELP: &str = "\
Commands:
    list                      show the task list
    cal                       show the calendar
    next [n] | prev [n]       move the calendar by n months (default: 1)
    reload                    fetch both views again
    new                       open the form to create a task
    edit <id>                 open the form to edit a displayed task
    name|desc|due|recur <v>   set a form field (dates as YYYY-MM-DDTHH:MM)
    freq <frequency>          set the form frequency (None, Daily, Weekly, Monthly, Yearly, Custom)
    form                      show the form
    save | cancel             submit or discard the form
    status <id> <status>      change the status of a task (Pending, InProgress, Completed, Cancelled)
    delete <id>               delete a task
    filter [key=value ...]    filter the list by status, frequency, name, from, to,
                              created-from, created-to, updated-from, updated-to. No argument clears the filter
    quit";


/// Prompts the user on the terminal
struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        stdout().flush().ok();
        let mut answer = String::new();
        if stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }

    fn alert(&self, message: &str) {
        eprintln!("!!! {}", message);
    }
}


#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    if let Some(url) = std::env::args().nth(1) {
        match taskboard::config::API_BASE_URL.lock() {
            Ok(mut base_url) => *base_url = url,
            Err(_) => log::warn!("Unable to use {} as the server URL", url),
        }
    }

    let client = match ApiClient::from_config() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Unable to create the client: {}", err);
            std::process::exit(1);
        }
    };
    println!("Using the task server at {}", client.base_url());

    let mut coordinator = SyncCoordinator::new(client, TerminalPrompt);
    let (sender, receiver) = feedback_channel();
    coordinator.set_feedback_channel(sender);

    coordinator.reload().await;
    print_views(&coordinator);
    println!("{}", HELP);

    loop {
        print!("> ");
        stdout().flush().ok();
        let mut line = String::new();
        match stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => (),
        }

        match run_command(&coordinator, &receiver, line.trim()).await {
            Ok(true) => (),
            Ok(false) => break,
            Err(err) => eprintln!("{}", err),
        }
    }
}

fn print_views(coordinator: &SyncCoordinator<ApiClient, TerminalPrompt>) {
    println!("---- Tasks -----");
    print_task_list(&coordinator.task_list());
    println!("---- Calendar -----");
    match coordinator.calendar() {
        Some(calendar) => print_calendar(&calendar),
        None => println!("    (no calendar for {})", coordinator.cursor()),
    }
}

/// Returns `Ok(false)` when the user wants to leave
async fn run_command(
    coordinator: &SyncCoordinator<ApiClient, TerminalPrompt>,
    feedback: &FeedbackReceiver,
    line: &str,
) -> Result<bool, Box<dyn Error>> {
    let (command, argument) = match line.find(' ') {
        Some(index) => (&line[..index], line[index+1..].trim()),
        None => (line, ""),
    };

    match command {
        "" => (),
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(false),
        "list" => print_task_list(&coordinator.task_list()),
        "cal" => print_views(coordinator),
        "next" | "prev" => {
            let steps: i32 = if argument.is_empty() { 1 } else { argument.parse()? };
            let delta = if command == "next" { steps } else { -steps };
            coordinator.change_month(delta).await;
            if let Some(calendar) = coordinator.calendar() {
                print_calendar(&calendar);
            }
        },
        "reload" => {
            coordinator.reload().await;
            print_views(coordinator);
        },
        "new" => {
            coordinator.open_new_task_form();
            print_form(&coordinator.form());
        },
        "edit" => {
            if coordinator.open_edit_form(&TaskId::from(argument)) == false {
                return Err(format!("Task {} is not displayed", argument).into());
            }
            print_form(&coordinator.form());
        },
        "name" => coordinator.edit_form(|form| form.set_name(argument)),
        "desc" => coordinator.edit_form(|form| form.set_description(argument)),
        "due" => coordinator.edit_form(|form| form.set_due_date(argument)),
        "recur" => coordinator.edit_form(|form| form.set_recurrence_date(argument)),
        "freq" => coordinator.edit_form(|form| form.set_frequency(Frequency::from(argument))),
        "form" => print_form(&coordinator.form()),
        "cancel" => coordinator.cancel_form(),
        "save" => {
            if coordinator.form().is_open() == false {
                return Err("The task form is not open. Use 'new' or 'edit' first".into());
            }
            coordinator.submit_form().await;
            println!("[{}]", *feedback.borrow());
            print_views(coordinator);
        },
        "status" => {
            let mut args = argument.split_whitespace();
            let id = args.next().ok_or("Missing task ID")?;
            let status: TaskStatus = args.next().ok_or("Missing status")?.parse()?;
            coordinator.set_status(&TaskId::from(id), status).await;
            println!("[{}]", *feedback.borrow());
            print_task_list(&coordinator.task_list());
        },
        "delete" => {
            if coordinator.delete_task(&TaskId::from(argument)).await {
                print_views(coordinator);
            }
        },
        "filter" => {
            coordinator.set_filter(parse_filter(argument)?).await;
            print_task_list(&coordinator.task_list());
        },
        other => return Err(format!("Unknown command {:?}. Type 'help' for the list of commands", other).into()),
    }
    Ok(true)
}

fn parse_filter(argument: &str) -> Result<TaskFilter, Box<dyn Error>> {
    let mut filter = TaskFilter::default();
    for pair in argument.split_whitespace() {
        let (key, value) = match pair.find('=') {
            Some(index) => (&pair[..index], &pair[index+1..]),
            None => return Err(format!("Invalid filter {:?}, expected key=value", pair).into()),
        };
        match key {
            "status" => filter.status = Some(value.parse()?),
            "frequency" | "freq" => filter.frequency = Some(Frequency::from(value)),
            "name" => filter.name = Some(value.to_string()),
            "from" => filter.due_start_date = Some(parse_day(value)?),
            "to" => filter.due_end_date = Some(parse_day(value)?),
            "created-from" => filter.created_start_date = Some(parse_day(value)?),
            "created-to" => filter.created_end_date = Some(parse_day(value)?),
            "updated-from" => filter.updated_start_date = Some(parse_day(value)?),
            "updated-to" => filter.updated_end_date = Some(parse_day(value)?),
            other => return Err(format!("Unknown filter key {:?}", other).into()),
        }
    }
    Ok(filter)
}

/// Midnight UTC of a `YYYY-MM-DD` day
fn parse_day(value: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or("Invalid date")?;
    Ok(Utc.from_utc_datetime(&midnight))
}
