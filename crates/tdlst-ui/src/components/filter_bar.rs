use tdlst_core::filter::StatusFilter;
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement
};
use yew::{
  Callback,
  Event,
  Html,
  InputEvent,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub query:     String,
  pub status:    StatusFilter,
  pub on_query:  Callback<String>,
  pub on_status: Callback<StatusFilter>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  let on_input = {
    let on_query = props.on_query.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_query.emit(input.value());
    })
  };

  let on_change = {
    let on_status =
      props.on_status.clone();
    Callback::from(move |e: Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      on_status.emit(
        StatusFilter::from_key(
          &select.value()
        )
      );
    })
  };

  let option = |status: StatusFilter,
                label: &str| {
    html! {
        <option value={status.as_key()} selected={props.status == status}>{ label }</option>
    }
  };

  html! {
      <div class="filters">
          <input type="text" placeholder="Search tasks..." value={props.query.clone()} oninput={on_input} />
          <select onchange={on_change}>
              { option(StatusFilter::Any, "All") }
              { option(StatusFilter::Completed, "Completed") }
              { option(StatusFilter::Pending, "Pending") }
          </select>
      </div>
  }
}
