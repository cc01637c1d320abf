use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub(crate) struct Index {
    branches: Vec<String>,
}

impl Index {
    pub fn new(branches: Vec<String>) -> Self {
        Index { branches }
    }
}
