//! Paged result picker.
//!
//! Labels are 1-based and global (page 2 starts at "11."), while the
//! `sel:` token of each button carries the 0-based global index.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::config::telegram::{MAX_BUTTON_LABEL_CHARS, PAGE_SIZE};
use crate::core::utils::truncate_chars;
use crate::lyrics::SongRecord;
use crate::telegram::callback::ActionToken;
use crate::telegram::texts;

/// One page of a result set. Borrowed, rebuilt on every render.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    records: &'a [SongRecord],
    page: usize,
    total_pages: usize,
}

impl<'a> PageView<'a> {
    /// Returns `None` when the page window is empty.
    pub fn new(records: &'a [SongRecord], page: usize) -> Option<Self> {
        let total_pages = total_pages(records.len());
        if page >= total_pages {
            return None;
        }
        Some(Self {
            records,
            page,
            total_pages,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Global index of the first record on this page.
    pub fn start(&self) -> usize {
        self.page * PAGE_SIZE
    }

    /// Records on this page.
    pub fn window(&self) -> &'a [SongRecord] {
        let end = (self.start() + PAGE_SIZE).min(self.records.len());
        &self.records[self.start()..end]
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn header(&self) -> String {
        texts::page_header(self.page, self.total_pages)
    }

    /// One button per record, then the navigation row.
    pub fn keyboard(&self) -> InlineKeyboardMarkup {
        let mut rows: Vec<Vec<InlineKeyboardButton>> = self
            .window()
            .iter()
            .enumerate()
            .map(|(offset, record)| {
                let index = self.start() + offset;
                vec![InlineKeyboardButton::callback(
                    button_label(index, record),
                    ActionToken::Select(index).to_string(),
                )]
            })
            .collect();

        let mut nav = Vec::with_capacity(3);
        if self.has_prev() {
            nav.push(InlineKeyboardButton::callback(
                texts::PREV_BUTTON,
                ActionToken::Navigate(self.page - 1).to_string(),
            ));
        }
        nav.push(InlineKeyboardButton::callback(
            texts::CANCEL_BUTTON,
            ActionToken::Cancel.to_string(),
        ));
        if self.has_next() {
            nav.push(InlineKeyboardButton::callback(
                texts::NEXT_BUTTON,
                ActionToken::Navigate(self.page + 1).to_string(),
            ));
        }
        rows.push(nav);

        InlineKeyboardMarkup::new(rows)
    }
}

/// `ceil(len / PAGE_SIZE)`
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// `"{index+1}. {track} - {artist}"`, capped for Telegram buttons.
pub fn button_label(index: usize, record: &SongRecord) -> String {
    truncate_chars(
        &format!("{}. {}", index + 1, record.display_title()),
        MAX_BUTTON_LABEL_CHARS,
    )
}
