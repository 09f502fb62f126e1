use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub on_add: Callback<String>
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let draft = use_state(String::new);

  let on_input = {
    let draft = draft.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      draft.set(input.value());
    })
  };

  let on_submit = {
    let draft = draft.clone();
    let on_add = props.on_add.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if draft.trim().is_empty() {
        return;
      }
      on_add.emit((*draft).clone());
      draft.set(String::new());
    })
  };

  html! {
      <form class="task-form" onsubmit={on_submit}>
          <input type="text" placeholder="What needs doing?" value={(*draft).clone()} oninput={on_input} />
          <button class="btn" type="submit">{ "Add" }</button>
      </form>
  }
}
