// Interactive menu: the sidebar (dataset + tab selectors) and the
// per-tab widgets, driven from stdin.
use std::io::{self, BufRead, Write};

use crate::brands::item_categories;
use crate::config::DisplayConfig;
use crate::dashboard::Dashboard;
use crate::navigation::{Dataset, Navigator, Selections, SpendMode, Tab};
use crate::render::render_view;
use crate::segments::segments_present;
use crate::spend::top_customers;
use crate::types::{Month, Segment};

pub struct Shell<'a, R, W> {
    dashboard: &'a Dashboard,
    display: &'a DisplayConfig,
    nav: Navigator,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(dashboard: &'a Dashboard, display: &'a DisplayConfig, input: R, out: W) -> Self {
        Self {
            dashboard,
            display,
            nav: Navigator::default(),
            input,
            out,
        }
    }

    /// Print `label`, read one line without its line ending. `None` on
    /// end of input.
    fn prompt_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let len = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(len);
        Ok(Some(buf))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        Ok(self.prompt_line(label)?.map(|s| s.trim().to_string()))
    }

    /// Numbered pick from `options`; blank or bad input keeps `default`.
    fn pick<T: Copy + std::fmt::Display>(
        &mut self,
        title: &str,
        options: &[T],
        default: usize,
    ) -> io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }
        writeln!(self.out, "{title}")?;
        for (idx, opt) in options.iter().enumerate() {
            writeln!(self.out, "[{}] {}", idx + 1, opt)?;
        }
        let answer = self.prompt("Enter choice: ")?.unwrap_or_default();
        let idx = match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => n - 1,
            Ok(_) | Err(_) if !answer.is_empty() => {
                writeln!(self.out, "Invalid choice. Using {}.", options[default])?;
                default
            }
            _ => default,
        };
        Ok(Some(options[idx]))
    }

    fn read_months(&mut self) -> io::Result<Vec<Month>> {
        let answer = self
            .prompt("Select Months (e.g. Jan,Mar; blank for all): ")?
            .unwrap_or_default();
        if answer.is_empty() {
            return Ok(Month::ALL.to_vec());
        }
        let mut months = Vec::new();
        for part in answer.split(',') {
            match Month::parse(part) {
                Some(m) => months.push(m),
                None => writeln!(self.out, "Ignoring unknown month '{}'.", part.trim())?,
            }
        }
        Ok(months)
    }

    fn read_count(&mut self, label: &str) -> io::Result<Option<usize>> {
        let answer = self.prompt(label)?.unwrap_or_default();
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse::<usize>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                writeln!(self.out, "Invalid number. Using the default.")?;
                Ok(None)
            }
        }
    }

    /// Ask for the widgets of the current tab. Always starts from
    /// defaults; nothing is remembered from the previous visit.
    fn collect_selections(&mut self) -> io::Result<Selections> {
        let mut sel = Selections::new(self.display);
        let dashboard = self.dashboard;
        let rows = dashboard.dataset(self.nav.dataset).rows.as_slice();

        match self.nav.tab {
            Tab::SegmentDistribution => {
                // matched as typed, spaces included
                sel.customer_query = self.prompt_line("Enter Customer Name: ")?;
                let segments = segments_present(rows);
                sel.segment = self.pick("Select a Segment:", &segments, 0)?;
            }
            Tab::AvgSpend => {
                let mode = self.pick("View Option:", &["All Months", "Individual Months"], 0)?;
                if mode == Some("Individual Months") {
                    sel.spend_mode = SpendMode::IndividualMonths;
                    sel.months = self.read_months()?;
                }
                let pool = top_customers(rows, 1).pool_size;
                let label = format!(
                    "Select Number of Customers to Display (1-{}, default {}): ",
                    pool.max(1),
                    self.display.top_customers
                );
                if let Some(n) = self.read_count(&label)? {
                    sel.top_customers = n;
                }
            }
            Tab::BrandAnalysis => {
                sel.segment = self.pick("Select a Segment:", &Segment::ALL, 0)?;
                let categories = item_categories(rows);
                let names: Vec<&str> = categories.iter().map(String::as_str).collect();
                sel.category = self
                    .pick("Select an Item Category:", &names, 0)?
                    .map(str::to_string);
                sel.months = self.read_months()?;
                sel.top_brands = self.read_count("Select Number of Brands (blank for all): ")?;
            }
            Tab::RawData => {
                let pages = rows.len().div_ceil(self.display.raw_rows.max(1)).max(1);
                if pages > 1 {
                    let label = format!("Select Page (1-{pages}, default 1): ");
                    if let Some(n) = self.read_count(&label)? {
                        sel.page = n;
                    }
                }
            }
            Tab::Home | Tab::Recommendations => {}
        }
        Ok(sel)
    }

    fn show_current_tab(&mut self) -> io::Result<()> {
        let selections = self.collect_selections()?;
        let Navigator { dataset, tab } = self.nav;
        tracing::debug!(%dataset, %tab, ?selections, "rendering tab");
        let view = self
            .dashboard
            .derive_view(dataset, tab, &selections, self.display.raw_rows);
        writeln!(self.out)?;
        writeln!(self.out, "{}", render_view(dataset, tab, &view, self.display))?;
        Ok(())
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.out, "Dataset: {} | Tab: {}", self.nav.dataset, self.nav.tab)?;
            writeln!(self.out, "[1] Select App (Retail/Wholesale)")?;
            writeln!(self.out, "[2] Select a tab")?;
            writeln!(self.out, "[0] Exit\n")?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => {
                    let current = Dataset::ALL
                        .iter()
                        .position(|d| *d == self.nav.dataset)
                        .unwrap_or(0);
                    if let Some(ds) = self.pick("Select App:", &Dataset::ALL, current)? {
                        self.nav.select_dataset(ds);
                    }
                    writeln!(self.out)?;
                }
                "2" => {
                    let current = Tab::ALL.iter().position(|t| *t == self.nav.tab).unwrap_or(0);
                    if let Some(tab) = self.pick("Select a tab:", &Tab::ALL, current)? {
                        self.nav.select_tab(tab);
                        self.show_current_tab()?;
                    }
                }
                "0" => break,
                _ => writeln!(self.out, "Invalid choice. Please enter 0, 1 or 2.\n")?,
            }
        }
        writeln!(self.out, "Exiting the program.")?;
        Ok(())
    }
}
