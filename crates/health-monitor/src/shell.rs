//! Numbered-menu front end.
//!
//! Export, import and summary run in the background. Their outcomes come
//! back over a channel and are printed before the next menu, so the prompt
//! never waits on file I/O. Exit waits for whatever is still running.

use std::fmt::Display;

use health_records::AddReportOutcome;
use health_types::{HealthReport, Patient, PatientId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::monitor::{HealthMonitor, TaskHandle};

const MENU: &str = "1. Add Patient
2. Add Report to Patient
3. View Patient Reports
4. Search Patients by Name
5. Export Data to CSV
6. Import Data from CSV
7. Generate Summary Report
8. Exit
";

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Register a new patient.
    AddPatient,
    /// Append a report to a patient.
    AddReport,
    /// Show one patient's reports.
    ViewReports,
    /// Search patients by name.
    SearchByName,
    /// Export the store to a file.
    Export,
    /// Import a file into the store.
    Import,
    /// Print patient and report totals.
    Summary,
    /// Leave the shell.
    Exit,
}

impl MenuChoice {
    /// Parses a menu number.
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AddPatient),
            "2" => Some(Self::AddReport),
            "3" => Some(Self::ViewReports),
            "4" => Some(Self::SearchByName),
            "5" => Some(Self::Export),
            "6" => Some(Self::Import),
            "7" => Some(Self::Summary),
            "8" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive shell over an async line source and an async writer.
pub struct Shell<R, W> {
    monitor: HealthMonitor,
    input: Lines<R>,
    output: W,
    notices_tx: UnboundedSender<String>,
    notices_rx: UnboundedReceiver<String>,
    pending: Vec<JoinHandle<()>>,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a shell reading commands from `input` and printing to `output`.
    pub fn new(monitor: HealthMonitor, input: R, output: W) -> Self {
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        Self {
            monitor,
            input: input.lines(),
            output,
            notices_tx,
            notices_rx,
            pending: Vec::new(),
        }
    }

    /// Consumes the shell and returns its writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu loop until Exit or end of input.
    pub async fn run(&mut self) -> std::io::Result<()> {
        loop {
            self.print_ready_notices().await?;
            self.write(MENU).await?;

            let Some(line) = self.prompt("Choose an option: ").await? else {
                break;
            };

            let Some(choice) = MenuChoice::from_input(&line) else {
                self.write_line("Invalid choice. Please try again.").await?;
                continue;
            };

            tracing::debug!(?choice, "Menu selection");
            let keep_going = match choice {
                MenuChoice::AddPatient => self.add_patient().await?,
                MenuChoice::AddReport => self.add_report().await?,
                MenuChoice::ViewReports => self.view_reports().await?,
                MenuChoice::SearchByName => self.search_by_name().await?,
                MenuChoice::Export => self.export().await?,
                MenuChoice::Import => self.import().await?,
                MenuChoice::Summary => {
                    let handle = self.monitor.summary();
                    self.track(handle, |summary| summary.to_string(), "Error generating summary");
                    true
                }
                MenuChoice::Exit => false,
            };

            if !keep_going {
                break;
            }
        }

        self.finish_pending().await?;
        self.write_line("Exiting...").await
    }

    async fn add_patient(&mut self) -> std::io::Result<bool> {
        let Some(id) = self.prompt_id().await? else {
            return Ok(true);
        };
        let Some(name) = self.prompt("Enter patient name: ").await? else {
            return Ok(false);
        };
        let Some(contact) = self.prompt("Enter contact info: ").await? else {
            return Ok(false);
        };

        self.monitor.add_patient(Patient::new(id, name, contact)).await;
        Ok(true)
    }

    async fn add_report(&mut self) -> std::io::Result<bool> {
        let Some(id) = self.prompt_id().await? else {
            return Ok(true);
        };

        let Some(report) = self.prompt_report().await? else {
            return Ok(false);
        };

        match self.monitor.add_report_to_patient(id, report).await {
            AddReportOutcome::Added => self.write_line("Report added successfully.").await?,
            AddReportOutcome::PatientNotFound(_) => self.write_line("Patient not found.").await?,
        }
        Ok(true)
    }

    async fn view_reports(&mut self) -> std::io::Result<bool> {
        let Some(id) = self.prompt_id().await? else {
            return Ok(true);
        };

        match self.monitor.render_reports_for(id).await {
            Some(rendered) => self.write(&rendered).await?,
            None => self.write_line("Patient not found.").await?,
        }
        Ok(true)
    }

    async fn search_by_name(&mut self) -> std::io::Result<bool> {
        let Some(name) = self.prompt("Enter patient name: ").await? else {
            return Ok(false);
        };

        let found = self.monitor.find_by_name(&name).await;
        if found.is_empty() {
            self.write_line("No patients found with that name.").await?;
        }
        for patient in &found {
            self.write(&patient.render()).await?;
        }
        Ok(true)
    }

    async fn export(&mut self) -> std::io::Result<bool> {
        let Some(filename) = self.prompt("Enter filename to export data: ").await? else {
            return Ok(false);
        };

        let handle = self.monitor.export(&filename);
        self.track(
            handle,
            move |_| format!("Data exported successfully to {filename}"),
            "Error exporting data",
        );
        Ok(true)
    }

    async fn import(&mut self) -> std::io::Result<bool> {
        let Some(filename) = self.prompt("Enter filename to import data: ").await? else {
            return Ok(false);
        };

        let handle = self.monitor.import(&filename);
        self.track(
            handle,
            move |report| {
                let mut notice = format!("Data imported successfully from {filename}");
                if !report.is_clean() {
                    notice.push_str(&format!(
                        "\nSkipped {} malformed line(s):",
                        report.failures.len()
                    ));
                    for failure in &report.failures {
                        notice.push_str(&format!("\n  {failure}"));
                    }
                }
                notice
            },
            "Error importing data",
        );
        Ok(true)
    }

    /// Hands a background task to a reporter that posts its outcome.
    fn track<T, F>(&mut self, handle: TaskHandle<T>, on_success: F, failure_prefix: &'static str)
    where
        T: Send + 'static,
        F: FnOnce(T) -> String + Send + 'static,
    {
        let notices = self.notices_tx.clone();
        let reporter = tokio::spawn(async move {
            let notice = match handle.join().await {
                Ok(value) => on_success(value),
                Err(e) => format!("{failure_prefix}: {e}"),
            };
            // Receiver lives as long as the shell
            let _ = notices.send(notice);
        });

        self.pending.retain(|task| !task.is_finished());
        self.pending.push(reporter);
    }

    async fn finish_pending(&mut self) -> std::io::Result<()> {
        for task in self.pending.drain(..) {
            if let Err(e) = task.await {
                tracing::error!("Background reporter failed: {}", e);
            }
        }
        self.print_ready_notices().await
    }

    async fn print_ready_notices(&mut self) -> std::io::Result<()> {
        while let Ok(notice) = self.notices_rx.try_recv() {
            self.write_line(&notice).await?;
        }
        Ok(())
    }

    /// Prompts for a patient id. Returns `None` after reporting bad input.
    async fn prompt_id(&mut self) -> std::io::Result<Option<PatientId>> {
        let Some(raw) = self.prompt("Enter patient ID: ").await? else {
            return Ok(None);
        };

        match raw.trim().parse::<PatientId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.write_line("Invalid patient ID.").await?;
                Ok(None)
            }
        }
    }

    /// Prompts for the four report fields. `None` means input ended.
    async fn prompt_report(&mut self) -> std::io::Result<Option<HealthReport>> {
        let Some(date) = self.prompt("Enter report date (YYYY-MM-DD): ").await? else {
            return Ok(None);
        };
        let Some(diagnosis) = self.prompt("Enter diagnosis: ").await? else {
            return Ok(None);
        };
        let Some(doctor) = self.prompt("Enter doctor name: ").await? else {
            return Ok(None);
        };
        let Some(treatment) = self.prompt("Enter treatment: ").await? else {
            return Ok(None);
        };
        Ok(Some(HealthReport::new(date, diagnosis, doctor, treatment)))
    }

    async fn prompt(&mut self, label: &str) -> std::io::Result<Option<String>> {
        self.write(label).await?;
        self.input.next_line().await
    }

    async fn write_line(&mut self, text: impl Display) -> std::io::Result<()> {
        self.write(&format!("{text}\n")).await
    }

    async fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_records::PatientStore;
    use tokio::io::BufReader;

    async fn run_script(monitor: HealthMonitor, script: &str) -> String {
        let input = BufReader::new(script.as_bytes());
        let mut shell = Shell::new(monitor, input, Vec::new());
        shell.run().await.unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_menu_choice_from_input() {
        assert_eq!(MenuChoice::from_input("1"), Some(MenuChoice::AddPatient));
        assert_eq!(MenuChoice::from_input(" 8 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::from_input("9"), None);
        assert_eq!(MenuChoice::from_input("abc"), None);
    }

    #[tokio::test]
    async fn test_add_patient_report_and_view() {
        let script = "1\n1\nBob\nbob@x.com\n\
                      2\n1\n2024-01-01\nflu\nDr. X\nrest\n\
                      3\n1\n\
                      8\n";
        let output = run_script(HealthMonitor::new(PatientStore::new()), script).await;

        assert!(output.contains("Report added successfully.\n"));
        assert!(output.contains(
            "Patient ID: 1, Name: Bob, Contact: bob@x.com\n\
             Date: 2024-01-01\n\
             Diagnosis: flu\n\
             Doctor: Dr. X\n\
             Treatment: rest\n\
             -------------------------\n"
        ));
        assert!(output.ends_with("Exiting...\n"));
    }

    #[tokio::test]
    async fn test_not_found_outcomes() {
        let script = "2\n5\n2024-01-01\nflu\nDr. X\nrest\n\
                      3\n5\n\
                      4\nNobody\n\
                      8\n";
        let monitor = HealthMonitor::new(PatientStore::new());
        let output = run_script(monitor.clone(), script).await;

        assert_eq!(output.matches("Patient not found.").count(), 2);
        assert!(output.contains("No patients found with that name."));
        assert!(monitor.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let monitor = HealthMonitor::new(PatientStore::new());
        monitor.add_patient(Patient::new(4, "Alice", "a@x.com")).await;

        let output = run_script(monitor, "4\nALICE\n8\n").await;
        assert!(output.contains("Patient ID: 4, Name: Alice, Contact: a@x.com\nNo reports found.\n"));
    }

    #[tokio::test]
    async fn test_invalid_input_does_not_end_the_loop() {
        let output = run_script(
            HealthMonitor::new(PatientStore::new()),
            "abc\n42\n1\nnot-a-number\n8\n",
        )
        .await;

        assert_eq!(output.matches("Invalid choice. Please try again.").count(), 2);
        assert!(output.contains("Invalid patient ID."));
        assert!(output.ends_with("Exiting...\n"));
    }

    #[tokio::test]
    async fn test_end_of_input_exits() {
        let output = run_script(HealthMonitor::new(PatientStore::new()), "1\n7\n").await;
        assert!(output.ends_with("Exiting...\n"));
    }

    #[tokio::test]
    async fn test_summary_is_reported_before_exit() {
        let monitor = HealthMonitor::new(PatientStore::new());
        monitor.add_patient(Patient::new(1, "Bob", "bob@x.com")).await;

        let output = run_script(monitor, "7\n8\n").await;
        assert!(output.contains("Summary Report:\nTotal Patients: 1\nTotal Reports: 0\n"));
    }

    #[tokio::test]
    async fn test_export_and_import_through_menu() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        let path = path.to_str().unwrap();

        let source = HealthMonitor::new(PatientStore::new());
        source.add_patient(Patient::new(1, "Bob", "bob@x.com")).await;
        source
            .add_report_to_patient(1, HealthReport::new("2024-01-01", "flu", "Dr. X", "rest"))
            .await;
        let output = run_script(source, &format!("5\n{path}\n8\n")).await;
        assert!(output.contains(&format!("Data exported successfully to {path}")));

        let target = HealthMonitor::new(PatientStore::new());
        let output = run_script(target.clone(), &format!("6\n{path}\n8\n")).await;
        assert!(output.contains(&format!("Data imported successfully from {path}")));
        assert_eq!(target.store().read().await.summarize().reports, 1);
    }

    #[tokio::test]
    async fn test_import_failure_is_reported() {
        let output = run_script(
            HealthMonitor::new(PatientStore::new()),
            "6\n/nonexistent/patients.csv\n8\n",
        )
        .await;
        assert!(output.contains("Error importing data: File not found: /nonexistent/patients.csv"));
    }

    #[tokio::test]
    async fn test_import_lists_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.csv");
        std::fs::write(
            &path,
            "2,Carol,c@x.com,2024-02-02,cold,Dr. Y,fluids\nbroken line\n",
        )
        .unwrap();
        let path = path.to_str().unwrap();

        let output = run_script(
            HealthMonitor::new(PatientStore::new()),
            &format!("6\n{path}\n8\n"),
        )
        .await;
        assert!(output.contains("Skipped 1 malformed line(s):\n  line 2: Missing fields: expected 7, found 1"));
    }
}
