mod driver;
mod page;

pub use driver::Driver;
pub use page::Page;
