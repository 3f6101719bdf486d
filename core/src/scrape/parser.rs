//! HTML parsing for the portal's bookings overview and conversation pages.
//!
//! Overview layout, per booking:
//!
//! ```text
//! ul.recent-inquiries--new        (first = current, second = upcoming)
//!  └── li
//!       ├── div.customer-name > strong          full name
//!       ├── div.listing-title > p               package title
//!       ├── div.inquiry-meta > strong × 3       price, arrival, departure
//!       └── a.btn.btn-info | a.mobile-link      conversation link
//! ```

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::{RecordError, ScrapeError};
use crate::model::booking::BookingType;
use crate::service::normalizer::{DetailFields, RawBooking};
use crate::time::parse_date;

pub const LIST_MARKER: &str = "recent-inquiries--new";

const LIST_KINDS: [BookingType; 2] = [BookingType::Current, BookingType::Upcoming];

/// Items of one overview list, each parsed independently.
#[derive(Debug)]
pub struct ParsedList {
    pub booking_type: BookingType,
    pub items: Vec<Result<RawBooking, RecordError>>,
}

struct Selectors {
    list: Selector,
    item: Selector,
    customer_name: Selector,
    package: Selector,
    meta: Selector,
    strong: Selector,
    info_link: Selector,
    mobile_link: Selector,
}

impl Selectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            list: selector(&format!("ul.{}", LIST_MARKER))?,
            item: selector("li")?,
            customer_name: selector("div.customer-name strong")?,
            package: selector("div.listing-title p")?,
            meta: selector("div.inquiry-meta")?,
            strong: selector("strong")?,
            info_link: selector("a.btn.btn-info[href]")?,
            mobile_link: selector("a.mobile-link[href]")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Structure(format!("bad selector {css}: {e}")))
}

fn text_of(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
}

pub fn parse_overview(html: &str) -> Result<Vec<ParsedList>, ScrapeError> {
    let sel = Selectors::new()?;
    let document = Html::parse_document(html);

    let lists: Vec<ElementRef> = document.select(&sel.list).collect();
    match lists.len() {
        0 => {
            return Err(ScrapeError::Structure(format!(
                "no ul.{LIST_MARKER} lists on the bookings page (session expired?)"
            )))
        }
        1 => warn!("only one booking list on the page; upcoming bookings unavailable"),
        2 => {}
        n => warn!("{} booking lists on the page; only the first two are read", n),
    }

    let parsed = lists
        .into_iter()
        .zip(LIST_KINDS)
        .map(|(list, booking_type)| ParsedList {
            booking_type,
            items: list.select(&sel.item).map(|item| parse_item(&sel, item)).collect(),
        })
        .collect();

    Ok(parsed)
}

fn parse_item(sel: &Selectors, item: ElementRef) -> Result<RawBooking, RecordError> {
    let full_name = first_text(item, &sel.customer_name);
    let package_name = first_text(item, &sel.package);
    if full_name.is_none() && package_name.is_none() {
        return Err(RecordError::MissingElement("customer-name and listing-title"));
    }

    let (price, arrival_date, departure_date) = match item.select(&sel.meta).next() {
        Some(meta) => {
            let values: Vec<String> = meta.select(&sel.strong).map(text_of).collect();
            split_meta(&values)?
        }
        None => (None, None, None),
    };

    let conversation_link = item
        .select(&sel.info_link)
        .chain(item.select(&sel.mobile_link))
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(String::from);

    Ok(RawBooking {
        full_name,
        package_name,
        price,
        arrival_date,
        departure_date,
        conversation_link,
        ..RawBooking::default()
    })
}

type MetaFields = (Option<String>, Option<String>, Option<String>);

/// Price, arrival and departure are only told apart by position, so a block that
/// does not look like `[price, date, date, ..]` is rejected rather than guessed at.
fn split_meta(values: &[String]) -> Result<MetaFields, RecordError> {
    match values {
        [] => Ok((None, None, None)),
        [price, arrival, departure, ..] => {
            if parse_date(arrival).is_none() || parse_date(departure).is_none() {
                return Err(RecordError::MetaLayout(format!(
                    "expected dates in positions 2 and 3, got '{arrival}' and '{departure}'"
                )));
            }
            Ok((Some(price.clone()), Some(arrival.clone()), Some(departure.clone())))
        }
        short => Err(RecordError::MetaLayout(format!(
            "expected 3 values, got {}",
            short.len()
        ))),
    }
}

/// Reads the "Guests" and "Room" entries of a conversation page's `dt`/`dd` pairs.
pub fn parse_detail(html: &str) -> Result<DetailFields, ScrapeError> {
    let containers = selector("div.col-xs-6, div.col-md-4, div.col-lg-8")?;
    let dt = selector("dt")?;
    let dd = selector("dd")?;
    let document = Html::parse_document(html);

    let mut fields = DetailFields::default();
    for container in document.select(&containers) {
        let (Some(label), Some(value)) = (container.select(&dt).next(), container.select(&dd).next()) else {
            continue;
        };
        let label = text_of(label);

        if fields.guests.is_none() && label.contains("Guests") {
            let text = text_of(value);
            fields.guests = first_number(&text).or(Some(text));
        } else if fields.room_type.is_none() && label.contains("Room") {
            // Extra room details follow on later lines.
            fields.room_type = value
                .text()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(String::from);
        }

        if fields.guests.is_some() && fields.room_type.is_some() {
            break;
        }
    }
    Ok(fields)
}

fn first_number(text: &str) -> Option<String> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}

/// Anti-forgery token on the login form, when the portal issues one.
pub fn csrf_token(html: &str) -> Result<Option<String>, ScrapeError> {
    let input = selector(r#"input[name="csrfmiddlewaretoken"]"#)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&input)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(String::from))
}
