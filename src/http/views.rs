//! Tera templates and the view models handed to them.

use serde::Serialize;
use tera::{Context, Tera};

use super::session::Flash;
use crate::domain::list::{sort_lists, sort_todos, Todo, TodoList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Lists,
    NewList,
    List,
    EditList,
}

impl Page {
    fn template(self) -> &'static str {
        match self {
            Page::Lists => "lists.html",
            Page::NewList => "new_list.html",
            Page::List => "list.html",
            Page::EditList => "edit_list.html",
        }
    }
}

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("../../templates/layout.html")),
            ("lists.html", include_str!("../../templates/lists.html")),
            ("new_list.html", include_str!("../../templates/new_list.html")),
            ("list.html", include_str!("../../templates/list.html")),
            ("edit_list.html", include_str!("../../templates/edit_list.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Renders `page` with `model` plus the flash messages consumed for this response.
    pub fn render<T: Serialize>(&self, page: Page, model: &T, flash: &Flash) -> Result<String, tera::Error> {
        let mut context = Context::from_serialize(model)?;
        context.insert("flash", flash);
        self.tera.render(page.template(), &context)
    }
}

#[derive(Debug, Serialize)]
pub struct ListSummary {
    pub id: i64,
    pub name: String,
    pub todos_count: usize,
    pub todos_remaining: usize,
    pub complete: bool,
}

impl From<&TodoList> for ListSummary {
    fn from(list: &TodoList) -> Self {
        Self {
            id: list.id.0,
            name: list.name.clone(),
            todos_count: list.todos_count(),
            todos_remaining: list.todos_remaining_count(),
            complete: list.is_complete(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoView {
    pub id: i64,
    pub name: String,
    pub completed: bool,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        Self { id: todo.id.0, name: todo.name.clone(), completed: todo.completed }
    }
}

#[derive(Debug, Serialize)]
pub struct ListsPage {
    pub lists: Vec<ListSummary>,
}

impl ListsPage {
    pub fn new(lists: &[TodoList]) -> Self {
        Self { lists: sort_lists(lists).into_iter().map(ListSummary::from).collect() }
    }
}

#[derive(Debug, Serialize)]
pub struct ListPage {
    pub list: ListSummary,
    pub todos: Vec<TodoView>,
    /// Redisplayed in the new-todo field after a rejected submission.
    pub todo_name: String,
}

impl ListPage {
    pub fn new(list: &TodoList, todo_name: impl Into<String>) -> Self {
        Self {
            list: ListSummary::from(list),
            todos: sort_todos(&list.todos).into_iter().map(TodoView::from).collect(),
            todo_name: todo_name.into(),
        }
    }
}

/// Model for both the new-list and edit-list forms.
#[derive(Debug, Serialize)]
pub struct ListFormPage {
    pub list: Option<ListSummary>,
    pub list_name: String,
}

impl ListFormPage {
    pub fn new(list: Option<&TodoList>, list_name: impl Into<String>) -> Self {
        Self { list: list.map(ListSummary::from), list_name: list_name.into() }
    }
}
