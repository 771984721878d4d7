use iced::{
    widget::{button, column, pick_list, row, scrollable, text, text_input, Space},
    Element, Length,
};

const MAX_LOG_LINES: usize = 500;

/// Main view state
pub struct DownloadView {
    pub url: String,
    pub format_labels: Vec<String>,
    pub selected_label: Option<String>,
    pub log_lines: Vec<String>,
    pub can_fetch: bool,
    pub can_download: bool,
    pub can_save: bool,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            url: String::new(),
            format_labels: Vec::new(),
            selected_label: None,
            log_lines: Vec::new(),
            can_fetch: true,
            can_download: false,
            can_save: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    FetchPressed,
    FormatSelected(String),
    DownloadPressed,
    SavePressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::FormatSelected(label) => {
                self.selected_label = Some(label);
            }
            DownloadMessage::FetchPressed
            | DownloadMessage::DownloadPressed
            | DownloadMessage::SavePressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn push_log(&mut self, line: String) {
        self.log_lines.push(line);
        if self.log_lines.len() > MAX_LOG_LINES {
            let excess = self.log_lines.len() - MAX_LOG_LINES;
            self.log_lines.drain(..excess);
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let buttons = row![
            button("Fetch Formats")
                .on_press_maybe(self.can_fetch.then_some(DownloadMessage::FetchPressed))
                .padding([10, 20]),
            button("Download")
                .on_press_maybe(self.can_download.then_some(DownloadMessage::DownloadPressed))
                .padding([10, 20]),
            button("Save File")
                .on_press_maybe(self.can_save.then_some(DownloadMessage::SavePressed))
                .padding([10, 20]),
        ]
        .spacing(5);

        let log: Element<'_, DownloadMessage> = if self.log_lines.is_empty() {
            text("Logs will appear here...").size(14).into()
        } else {
            column(
                self.log_lines
                    .iter()
                    .map(|line| text(line.as_str()).size(14).into()),
            )
            .spacing(2)
            .into()
        };

        column![
            text("Video Downloader").size(32),
            Space::new().height(Length::Fixed(10.0)),
            text_input("Enter video URL", &self.url)
                .on_input(DownloadMessage::UrlChanged)
                .on_submit(DownloadMessage::FetchPressed)
                .padding(10),
            buttons,
            pick_list(
                self.format_labels.as_slice(),
                self.selected_label.as_ref(),
                DownloadMessage::FormatSelected,
            )
            .placeholder("Select format")
            .width(Length::Fill),
            scrollable(log).height(Length::Fill).width(Length::Fill),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
