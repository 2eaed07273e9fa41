mod routing_test;
