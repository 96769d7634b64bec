pub mod todo_list_view;
