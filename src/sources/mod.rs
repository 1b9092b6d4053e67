pub mod calendar;
pub mod news;
pub mod prices;

pub use calendar::CalendarClient;
pub use news::NewsClient;
pub use prices::PriceClient;
