use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct SessionHeaderProps {
  pub user:      String,
  pub on_logout: Callback<()>
}

#[function_component(SessionHeader)]
pub fn session_header(
  props: &SessionHeaderProps
) -> Html {
  let on_logout = props.on_logout.clone();

  html! {
      <div class="header">
          <div>
              <h1>{ "My tasks" }</h1>
              <div class="author">{ "Signed in as " }<strong>{ &props.user }</strong></div>
          </div>
          <button class="btn" onclick={move |_| on_logout.emit(())}>{ "Sign out" }</button>
      </div>
  }
}
