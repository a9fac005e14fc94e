//! Month grid layout for the calendar view.
//!
//! # Invariants
//! - `cells().len()` is always a multiple of 7.
//! - Concrete dates appear in order, one per day of the month, with no gaps.
//! - Day counts come from chrono's calendar; nothing here knows month lengths
//!   or leap-year rules.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Number of columns in a month grid.
pub const DAYS_PER_WEEK: usize = 7;

/// One position in a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCell {
    /// Padding before the 1st or after the last day.
    Blank,
    Day(NaiveDate),
}

impl DayCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Blank => None,
            Self::Day(date) => Some(*date),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Cells of one month laid out in whole weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    first_day: NaiveDate,
    first_weekday: Weekday,
    cells: Vec<DayCell>,
}

/// Builds the grid for the month containing `month`.
///
/// `first_weekday` picks the leftmost column.
pub fn build_month_grid(month: NaiveDate, first_weekday: Weekday) -> MonthGrid {
    let first_day = month - Days::new(u64::from(month.day0()));
    let offset = leading_blanks(first_day.weekday(), first_weekday);

    let mut cells = vec![DayCell::Blank; offset];
    cells.extend(
        first_day
            .iter_days()
            .take_while(|day| day.month() == first_day.month())
            .map(DayCell::Day),
    );

    let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
    cells.extend(std::iter::repeat(DayCell::Blank).take(trailing));

    MonthGrid {
        first_day,
        first_weekday,
        cells,
    }
}

fn leading_blanks(first_of_month: Weekday, first_weekday: Weekday) -> usize {
    let column = first_of_month.num_days_from_monday() + 7 - first_weekday.num_days_from_monday();
    (column % 7) as usize
}

impl MonthGrid {
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Cells grouped into rows of seven.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_blank()).count()
    }

    pub fn days_in_month(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_blank()).count()
    }

    /// Column headers, starting at the grid's first weekday.
    pub fn weekday_headers(&self) -> [Weekday; DAYS_PER_WEEK] {
        let mut headers = [self.first_weekday; DAYS_PER_WEEK];
        for column in 1..DAYS_PER_WEEK {
            headers[column] = headers[column - 1].succ();
        }
        headers
    }

    /// Grid for the previous month, or `None` past chrono's date range.
    pub fn previous_month(&self) -> Option<MonthGrid> {
        self.first_day
            .checked_sub_months(Months::new(1))
            .map(|day| build_month_grid(day, self.first_weekday))
    }

    /// Grid for the next month, or `None` past chrono's date range.
    pub fn next_month(&self) -> Option<MonthGrid> {
        self.first_day
            .checked_add_months(Months::new(1))
            .map(|day| build_month_grid(day, self.first_weekday))
    }
}

#[cfg(test)]
mod tests {
    use super::{build_month_grid, leading_blanks, DayCell};
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn leading_blanks_follow_first_weekday() {
        assert_eq!(leading_blanks(Weekday::Wed, Weekday::Mon), 2);
        assert_eq!(leading_blanks(Weekday::Mon, Weekday::Mon), 0);
        assert_eq!(leading_blanks(Weekday::Sun, Weekday::Mon), 6);
        assert_eq!(leading_blanks(Weekday::Sun, Weekday::Sun), 0);
        assert_eq!(leading_blanks(Weekday::Sat, Weekday::Sun), 6);
    }

    #[test]
    fn any_day_in_month_yields_same_grid() {
        let from_first =
            build_month_grid(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), Weekday::Mon);
        let from_last =
            build_month_grid(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(), Weekday::Mon);
        assert_eq!(from_first, from_last);
    }

    #[test]
    fn headers_wrap_around_the_week() {
        let grid =
            build_month_grid(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap(), Weekday::Sat);
        assert_eq!(
            grid.weekday_headers(),
            [
                Weekday::Sat,
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]
        );
    }

    #[test]
    fn cell_accessors() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert_eq!(DayCell::Day(day).date(), Some(day));
        assert!(DayCell::Blank.is_blank());
        assert_eq!(DayCell::Blank.date(), None);
    }
}
