use tdlst_shared::{
  Task,
  TaskId
};
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  Properties,
  TargetCast,
  classes,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub task:      Task,
  pub on_toggle: Callback<TaskId>,
  pub on_edit:   Callback<(TaskId, String)>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let editing = use_state(|| false);
  let draft = use_state(String::new);
  let id = props.task.id.clone();

  let on_toggle = {
    let on_toggle = props.on_toggle.clone();
    let id = id.clone();
    Callback::from(move |_| {
      on_toggle.emit(id.clone())
    })
  };

  let on_delete = {
    let on_delete = props.on_delete.clone();
    let id = id.clone();
    Callback::from(move |_| {
      on_delete.emit(id.clone())
    })
  };

  let on_start_edit = {
    let editing = editing.clone();
    let draft = draft.clone();
    let text = props.task.text.clone();
    Callback::from(move |_| {
      draft.set(text.clone());
      editing.set(true);
    })
  };

  let on_draft = {
    let draft = draft.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      draft.set(input.value());
    })
  };

  let on_save = {
    let editing = editing.clone();
    let draft = draft.clone();
    let on_edit = props.on_edit.clone();
    let id = id.clone();
    Callback::from(move |_| {
      if draft.trim().is_empty() {
        return;
      }
      on_edit.emit((
        id.clone(),
        (*draft).clone()
      ));
      editing.set(false);
    })
  };

  let on_cancel = {
    let editing = editing.clone();
    Callback::from(move |_| {
      editing.set(false)
    })
  };

  let row_class = classes!(
    "row",
    props.task.completed.then_some("done")
  );

  html! {
      <div class={row_class}>
          <input type="checkbox" checked={props.task.completed} onclick={on_toggle} />
          {
              if *editing {
                  html! {
                      <>
                          <input class="text" type="text" value={(*draft).clone()} oninput={on_draft} />
                          <button class="btn" onclick={on_save}>{ "Save" }</button>
                          <button class="btn ghost" onclick={on_cancel}>{ "Cancel" }</button>
                      </>
                  }
              } else {
                  html! {
                      <>
                          <div class="text">
                              <div>{ &props.task.text }</div>
                              <div class="author">{ &props.task.author }</div>
                          </div>
                          <button class="btn ghost" onclick={on_start_edit}>{ "Edit" }</button>
                      </>
                  }
              }
          }
          <button class="btn ghost" onclick={on_delete}>{ "Delete" }</button>
      </div>
  }
}
