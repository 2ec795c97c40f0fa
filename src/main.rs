use std::path::PathBuf;

use anyhow::Result;
use derive_more::Display;
use formkit::config::Config;
use formkit::models::{FormFields, FormReport};
use formkit::page::Host;
use formkit::services::FormService;
use formkit::utils::conversion::{format_fixed4, Unit};
use inquire::{CustomType, Password, Select, Text};
use log::info;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

type MenuExit = Option<()>;
const MENU_EXIT: MenuExit = None;
const MENU_LOOP: MenuExit = Some(());

/// A text menu
trait Menu {
    /// Runs one round of the menu. Returns None when the menu
    /// wants to stop, or Some(()) to be shown again.
    fn enter(&mut self) -> Result<MenuExit>;

    /// Runs the menu until it asks to stop, reporting errors
    /// without leaving the loop.
    fn enter_loop(&mut self) {
        while let Some(result) = self.enter().transpose() {
            if let Err(error) = result {
                eprintln!("Error: {error}");
            }
        }
    }
}

/// Shows page alerts in the terminal
struct ConsoleHost;

impl Host for ConsoleHost {
    fn alert(&mut self, message: &str) {
        println!("[!] {message}");
    }
}

pub struct App {
    service: FormService,
}

impl App {
    pub fn new(service: FormService) -> Self {
        App { service }
    }

    pub fn start(&mut self) -> Result<()> {
        println!("Sign-up form checker and length converter.");
        self.enter_loop();
        Ok(())
    }
}

fn prompt_fields() -> Result<FormFields> {
    let username = Text::new("Username:")
        .with_help_message("At least 4 characters: letters, digits and '-'")
        .prompt()?;
    let password = Password::new("Password:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .with_help_message("At least 8 characters, with a letter, a digit and one of !@#$%^&*-_()")
        .prompt()?;
    let email = Text::new("Email:").prompt()?;
    let age = Text::new("Age:").prompt()?;

    Ok(FormFields {
        username,
        password,
        email,
        age,
    })
}

fn print_report(report: &FormReport) {
    if report.is_valid() {
        println!("The form is valid");
        return;
    }

    println!("The form is invalid");
    for rule in report.failures() {
        println!("  - {}: {rule}", rule.field());
    }
}

impl Menu for App {
    fn enter(&mut self) -> Result<MenuExit> {
        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("Fill in the sign-up form")]
            FillForm,
            #[display("Validate a submission file (JSON)")]
            ValidateFile,
            #[display("Convert a length")]
            Convert,
            #[display("Run the page handlers")]
            RunPage,
            #[display("Quit")]
            Exit,
        }

        let choice = Select::new("What do you want to do?", Choice::iter().collect()).prompt()?;

        match choice {
            Choice::FillForm => {
                let fields = prompt_fields()?;
                print_report(&self.service.submit(&fields));
            }

            Choice::ValidateFile => {
                let path: PathBuf = Text::new("Path to the submission:").prompt()?.into();
                let report = self.service.submit_file(&path)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }

            Choice::Convert => {
                let value = CustomType::<f64>::new("Value:")
                    .with_error_message("Please enter a valid number")
                    .prompt()?;
                let from = Select::new("From:", Unit::iter().collect()).prompt()?;
                let to = Select::new("To:", Unit::iter().collect()).prompt()?;

                let converted = self.service.convert(value, from, to)?;
                println!("{value} {from} = {} {to}", format_fixed4(converted));
            }

            Choice::RunPage => {
                println!("Values typed into the page form:");
                let fields = prompt_fields()?;
                let doc = self.service.run_page(&fields, &mut ConsoleHost)?;
                println!("\n{doc}");
            }

            Choice::Exit => return Ok(MENU_EXIT),
        }
        Ok(MENU_LOOP)
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    simple_logging::log_to_file(&config.log_file, config.log_level)?;
    info!("Starting with {:?}", config);

    App::new(FormService::new()).start()
}
