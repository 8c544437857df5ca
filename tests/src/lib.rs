#[cfg(test)]
mod control;
#[cfg(test)]
mod discovery;
