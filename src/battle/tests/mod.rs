mod common;

#[cfg(test)]
mod test_resolve_turn;




#[cfg(test)]
mod test_battle_items;



#[cfg(test)]
mod test_battle_end;
