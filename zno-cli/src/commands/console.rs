use std::collections::BTreeMap;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use zno::crud::{CrudService, DeleteOutcome, InsertOutcome};
use zno::migrations::apply_destination_migrations;
use zno::store::DestinationStore;
use zno::store::postgres::{PostgresStore, create_database_pool};
use zno::types::{ColumnKind, ID_COLUMN, Record, Table};
use zno_config::shared::ZnoConfig;

const MAIN_MENU: &str = "
                            MENU
        -----------------------------------------------------
          1. Parameterized Query
          2. Add Data
          3. Delete Data
          4. Exit
        -----------------------------------------------------
";

/// Tables in the order the sub-menus list them.
const MENU_TABLES: [(Table, &str); 5] = [
    (Table::Participants, "Participant"),
    (Table::RegisterLocations, "RegLocation"),
    (Table::EducationInstitutions, "EducationInstitution"),
    (Table::TestCenters, "UkrTestCenters"),
    (Table::TestResults, "UkrTestResults"),
];

pub(crate) async fn run(config: &ZnoConfig) -> Result<()> {
    let pool = create_database_pool(&config.destination, 1);
    apply_destination_migrations(&pool).await?;

    let mut console = Console {
        service: CrudService::new(PostgresStore::new(pool)),
        editor: DefaultEditor::new()?,
    };

    console.run().await
}

struct Console<S> {
    service: CrudService<S>,
    editor: DefaultEditor,
}

impl<S> Console<S>
where
    S: DestinationStore,
{
    async fn run(&mut self) -> Result<()> {
        loop {
            println!("{MAIN_MENU}");

            let Some(choice) = self.prompt("Please enter your choice(number): ")? else {
                break;
            };

            let result = match choice.trim() {
                "1" => self.query().await,
                "2" => self.insert().await,
                "3" => self.delete().await,
                "4" => break,
                _ => {
                    println!("Invalid choice. Please enter a valid option.");
                    continue;
                }
            };

            // A failed operation is reported and the console keeps running.
            if let Err(err) = result {
                println!("Error: {err}");
            }
        }

        println!("Exiting the program.");

        Ok(())
    }

    /// Reads one line; `None` once the user pressed Ctrl+C or Ctrl+D.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = tokio::task::block_in_place(|| self.editor.readline(prompt));

        match line {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn choose_table(&mut self, title: &str, action: &str) -> Result<Option<Table>> {
        println!("\n                     {title}");
        println!("        -----------------------------------------------------");
        for (position, (_, label)) in MENU_TABLES.iter().enumerate() {
            println!("          {}. {action} {label}", position + 1);
        }
        println!("        -----------------------------------------------------\n");

        let Some(choice) = self.prompt("Please enter your choice(number): ")? else {
            return Ok(None);
        };

        let table = choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| MENU_TABLES.get(index))
            .map(|(table, _)| *table);
        if table.is_none() {
            println!("Invalid choice. Please enter a valid option.");
        }

        Ok(table)
    }

    async fn query(&mut self) -> Result<()> {
        let Some(table) = self.choose_table("PARAMETERIZED QUERY MENU", "Select")? else {
            return Ok(());
        };

        println!("---Just leave field empty if it's not necessary---");
        let mut filters = BTreeMap::new();
        for field in table.field_names() {
            let Some(value) = self.prompt(&format!("Enter {field}: "))? else {
                return Ok(());
            };
            filters.insert(field.to_string(), value);
        }

        let rows = self.service.query(table, &filters).await?;

        println!("\n---------------------------------------------------------\n");
        println!("Records in table \"{table}\" with conditions:");
        for field in table.field_names() {
            let value = filters.get(field).map(String::as_str).unwrap_or_default();
            println!("{field}: {value}");
        }

        println!("\nResult:");
        if rows.is_empty() {
            println!("\nNo rows found.");
            return Ok(());
        }

        println!("Found {} rows", rows.len());
        println!("{:?}", table.field_names());
        for row in &rows {
            println!("{}", format_row(row));
        }

        Ok(())
    }

    async fn insert(&mut self) -> Result<()> {
        let Some(table) = self.choose_table("ADD DATA MENU", "Add")? else {
            return Ok(());
        };

        println!("---Fields with (*) can't be skipped---");
        let mut fields = BTreeMap::new();
        for column in table.columns() {
            let marker = match column.kind {
                ColumnKind::Reference(_) => "*",
                ColumnKind::Text => "",
            };
            let note = if column.unique { "(must be unique)" } else { "" };

            let Some(value) = self.prompt(&format!("{marker}Enter {}{note}: ", column.name))? else {
                return Ok(());
            };
            fields.insert(column.name.to_string(), value);
        }

        match self.service.insert(table, &fields).await? {
            InsertOutcome::Inserted(id) => {
                println!("Record added to {table} successfully with {ID_COLUMN}={id}.")
            }
            InsertOutcome::Rejected(rejection) => println!("Error: {rejection}."),
        }

        Ok(())
    }

    async fn delete(&mut self) -> Result<()> {
        let Some(table) = self.choose_table("DELETE DATA MENU", "Delete")? else {
            return Ok(());
        };

        let Some(id) = self.prompt("Enter ID to delete: ")? else {
            return Ok(());
        };

        match self.service.delete(table, &id).await? {
            DeleteOutcome::Deleted(id) => {
                println!("Record with {ID_COLUMN}={id} deleted from {table} successfully.")
            }
            DeleteOutcome::NotFound => {
                println!("No record found with {ID_COLUMN}={} in {table}.", id.trim())
            }
        }

        Ok(())
    }
}

fn format_row(row: &Record) -> String {
    let values = std::iter::once(row.id.to_string())
        .chain(row.values.iter().map(ToString::to_string))
        .collect::<Vec<_>>();

    format!("({})", values.join(", "))
}
